//! Prompt construction and output cleanup for vacancy generation.
//!
//! The request template and the ChatML wrapping match the prompt format
//! the service has always used, so prompts stay compatible with models
//! fine-tuned against it.

use crate::types::VacancyParams;

/// Capitalize a skill the way the request template expects: first letter
/// uppercased, the rest lowercased.
fn capitalize(skill: &str) -> String {
    let mut chars = skill.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Render the user-facing request text from the vacancy parameters.
///
/// Skills are capitalized and single-quoted; empty fields are left to the
/// system prompt's "omit what is empty" instruction.
pub fn build_request(params: &VacancyParams) -> String {
    let skills = params
        .key_skills
        .iter()
        .map(|skill| format!("'{}'", capitalize(skill)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Напиши текст вакансии для должности \"{}\". Название компании: \"{}\". \
Расположение: {}. График работы: {}. Опыт работы: {}. Ключевые навыки: {}",
        params.vacancy_name,
        params.company_name,
        params.company_place,
        params.schedule,
        params.experience,
        skills,
    )
}

/// Wrap a request in ChatML markers around the system prompt.
pub fn build_prompt(system_prompt: &str, request: &str) -> String {
    format!(
        "<|im_start|>system\n{system_prompt}<|im_end|>\n\
<|im_start|>user\n{request}<|im_end|>\n\
<|im_start|>assistant"
    )
}

/// Strip ChatML markers the model may echo and normalize `;` separators
/// to newlines.
pub fn clean_output(output: &str) -> String {
    output
        .replace("<|im_end|>", "")
        .replace("<|im_start|>", "")
        .replace(';', "\n")
}
