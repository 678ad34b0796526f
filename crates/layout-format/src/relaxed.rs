//! Repair of the "raw data" form layout editors show for copy and paste.
//!
//! That form omits the outer brackets and leaves object keys unquoted:
//! `["Esc",{w:2},"Tab"],["A"]`.

/// Quote bare object keys outside string literals.
///
/// A key is an identifier directly after `{` or `,` (whitespace allowed)
/// and directly before `:`. Anything else, including identifiers inside
/// strings and bare literals such as `true`, is copied unchanged.
pub fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut key_position = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if key_position && (c.is_ascii_alphabetic() || c == '_') {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            let mut j = i;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if chars.get(j) == Some(&':') {
                out.push('"');
                out.push_str(&ident);
                out.push('"');
            } else {
                out.push_str(&ident);
            }
            key_position = false;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                key_position = false;
            }
            '{' | ',' => key_position = true,
            c if c.is_whitespace() => {}
            _ => key_position = false,
        }
        out.push(c);
        i += 1;
    }
    out
}
