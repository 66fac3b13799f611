//! Fixed instruction templates sent to the generation service.
//!
//! Immutable configuration: composed per query, never rebuilt or mutated.

/// System preamble prepended to every prompt by the gateway.
pub const PREAMBLE: &str = "\
Sei un assistente virtuale specializzato nella gestione delle emergenze.
Il tuo scopo è fornire istruzioni rapide, pratiche e affidabili per aiutare gli utenti a gestire situazioni critiche come terremoti, alluvioni, incendi o emergenze mediche.
Le tue risposte devono essere:
1. Chiare e concise.
2. Basate su linee guida standard di sicurezza e primo soccorso.
3. Fornite passo passo quando si tratta di emergenze mediche o di sicurezza.
Ora sei pronto per rispondere.";

/// Sentinel the extraction template asks the model to emit when the query
/// names no place.
pub const NO_LOCATION_SENTINEL: &str = "Località non specificata";

/// Ask the model to bucket a query into one of the category tokens.
pub fn classification(query: &str) -> String {
    format!(
        "L'utente ha chiesto: \"{query}\"\n\
         Classifica questa domanda come una delle seguenti categorie:\n\
         - location_query: se riguarda una posizione o un punto di raccolta.\n\
         - emergency_medical: se riguarda una situazione di emergenza medica.\n\
         - emergency_natural: se riguarda emergenze naturali come terremoti, alluvioni o incendi.\n\
         - general: se riguarda una richiesta generica o un'emergenza generale non specifica.\n\
         Rispondi solo con una delle categorie sopra elencate.\n\
         Se non riesci a classificare la domanda, rispondi con \"unknown\"."
    )
}

/// Ask the model for the place name mentioned in the query, or the sentinel.
pub fn location_extraction(query: &str) -> String {
    format!(
        "L'utente ha chiesto: \"{query}\"\n\
         Identifica il nome della città, dell'indirizzo o della località nella domanda.\n\
         Rispondi solo con il nome della città, dell'indirizzo o della località. \
         Se non trovi un riferimento, rispondi con \"{NO_LOCATION_SENTINEL}\"."
    )
}

/// Step-by-step first aid, for medical emergencies.
pub fn first_aid(query: &str) -> String {
    format!("Fornisci istruzioni di primo soccorso passo passo per: {query}")
}

/// Step-by-step emergency instructions, for natural emergencies.
pub fn natural_emergency(query: &str) -> String {
    format!("Fornisci istruzioni passo passo per: {query}")
}
