// Prompt constants for the password suggester.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Framing for the suggestion call. The demo asks for a weak, guessable
/// password on purpose.
pub const SUGGEST_SYSTEM_PREAMBLE: &str = "You help a security awareness demo show \
    how guessable passwords built from personal facts are.";

/// Suggestion prompt template.
/// Replace: {keywords_json}, {min_len}, {max_len}, {symbols}
pub const SUGGEST_PROMPT_TEMPLATE: &str = r#"Generate one predictable password using these keywords as inspiration:
{keywords_json}

Requirements:
- Must be between {min_len} and {max_len} characters long
- Must include uppercase, lowercase, numbers, and at least one of these symbols: {symbols}
- Must NOT include spaces
- Return ONLY the password string, with no quotes and no explanation"#;
