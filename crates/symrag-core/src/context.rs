//! Formats aggregated hits into the context block handed to answer synthesis.

use crate::models::Hit;

/// Joins hits into one context string: a `[file]:` header per hit, with the
/// snippet's `... `-separated segments pushed onto their own lines so the
/// model sees each excerpt distinctly.
pub fn format_context(hits: &[Hit]) -> String {
    let parts: Vec<String> = hits
        .iter()
        .map(|hit| {
            let snippet = hit.snippet.replace("... ", "\n... ");
            format!("[{}]:\n{}", hit.file, snippet)
        })
        .collect();
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(file: &str, snippet: &str) -> Hit {
        Hit {
            file: file.to_string(),
            score: "1.0".to_string(),
            snippet: snippet.to_string(),
            keyword: "k".to_string(),
        }
    }

    #[test]
    fn each_hit_gets_a_file_header() {
        let ctx = format_context(&[hit("a.md", "alpha"), hit("b.md", "beta")]);
        assert_eq!(ctx, "[a.md]:\nalpha\n[b.md]:\nbeta");
    }

    #[test]
    fn ellipsis_segments_go_on_their_own_lines() {
        let ctx = format_context(&[hit("a.md", "first part... second part... third")]);
        assert_eq!(ctx, "[a.md]:\nfirst part\n... second part\n... third");
    }

    #[test]
    fn no_hits_yields_empty_context() {
        assert_eq!(format_context(&[]), "");
    }
}
