use super::Language;

pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator for a farming assistant. \
     Translate the user's message {source_clause}into {target_language}. \
     Output only the translated text without any explanations. \
     Keep numbers, units, place names and crop names intact.";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(source: Option<Language>, target: Language) -> String {
    // {source_clause} and {target_language} are placeholders, not format arguments
    let source_clause = source.map_or_else(String::new, |lang| format!("from {} ", lang.name()));

    SYSTEM_PROMPT_TEMPLATE
        .replace("{source_clause}", &source_clause)
        .replace("{target_language}", target.name())
}
