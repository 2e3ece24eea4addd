//! Multi-document splitting.
//!
//! A rendered asset may carry several YAML documents separated by
//! delimiter lines. Splitting happens line-wise: a boundary is a line
//! consisting solely of the delimiter token, and segments with no actual
//! content (whitespace and `#` comments only) are discarded — they do not
//! count as documents.

/// Default document separator line.
pub const DEFAULT_DELIMITER: &str = "---";

/// Split `content` into documents on lines matching `delimiter` exactly.
///
/// Only the supplied delimiter is honored; output order equals input
/// order. Trailing whitespace on a delimiter line is tolerated so CRLF
/// input splits the same as LF input.
pub fn split_documents(content: &str, delimiter: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut current = String::new();
    for line in content.lines() {
        if line.trim_end() == delimiter {
            push_document(&mut documents, &mut current);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_document(&mut documents, &mut current);
    documents
}

fn push_document(documents: &mut Vec<String>, current: &mut String) {
    let document = std::mem::take(current);
    if !is_blank(&document) {
        documents.push(document);
    }
}

/// True when every line is whitespace or a `#` comment.
fn is_blank(segment: &str) -> bool {
    segment.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with('#')
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
