//! Prompts for the clue-writing model.

use super::GenerationRequest;
use std::fmt::Write;

/// System prompt casting the model as the puzzle editor.
pub fn system_prompt() -> &'static str {
    "You are the editor of the puzzle round of a television quiz show. \
     Your job is to write puzzles in which players find four hidden terms \
     from twelve shuffled clues."
}

/// User prompt describing the theme, the terms and the answer format.
pub fn user_prompt(request: &GenerationRequest, language: &str) -> String {
    let theme = match request.theme().trim() {
        "" => "Choose a theme that fits the terms",
        theme => theme,
    };

    let mut terms = String::new();
    for (index, input) in request.terms().iter().enumerate() {
        let _ = write!(terms, "Term {}: \"{}\"", index + 1, input.term.trim());
        let suggestions: Vec<_> = input.suggestions().collect();
        if !suggestions.is_empty() {
            let _ = write!(terms, " (user suggestions for clues: {})", suggestions.join(", "));
        }
        terms.push('\n');
    }

    format!(
        "Create a puzzle round from the following input.\n\
         Theme: {theme}\n\
         \n\
         The input contains 4 terms. For each term I need EXACTLY 3 short, catchy clues.\n\
         \n\
         Instructions:\n\
         1. Use the given terms.\n\
         2. If there are user suggestions for clues, use them or sharpen them so they are short and punchy.\n\
         3. Otherwise invent clever, creative and short associations (1-3 words per clue).\n\
         4. The result must consist of 4 terms with 3 clues each.\n\
         5. Write in {language}.\n\
         \n\
         Answer with JSON only, in this shape:\n\
         {{\"theme\": \"...\", \"groups\": [{{\"term\": \"...\", \"clues\": [\"...\", \"...\", \"...\"]}}]}}\n\
         \n\
         Input terms:\n\
         {terms}"
    )
}
