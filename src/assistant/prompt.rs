/// Returns the prompt addressed to the assistant, if the message invokes it.
///
/// A message invokes the assistant when its first token is `ai` or `@ai` in
/// any case. The token ends at whitespace, `:` or `,`. The prompt is whatever
/// follows those separators; an empty prompt is not an invocation.
pub fn extract_prompt(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let token_end = trimmed.find(is_separator).unwrap_or(trimmed.len());
    let (token, rest) = trimmed.split_at(token_end);

    let token = token.to_lowercase();
    if token != "ai" && token != "@ai" {
        return None;
    }

    let prompt = rest.trim_start_matches(is_separator).trim_end();
    if prompt.is_empty() {
        None
    } else {
        Some(prompt)
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ':' || c == ','
}
