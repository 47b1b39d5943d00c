//! HTML rendering for the single form page
//!
//! Everything that came from the user or the model is escaped here.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::form::{UploadForm, ValidationError};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Document Q&amp;A</title>
<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }
textarea, input[type=text] { width: 100%; }
.errorlist { color: #b00020; }
.result { white-space: pre-wrap; border: 1px solid #ccc; padding: 1rem; }
</style>
</head>
<body>
<h1>Ask a question about your text</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Render the whole page: form, field errors and the result block
pub fn render_index(form: &UploadForm, errors: Option<&ValidationError>, result: &str) -> String {
    let content_errors = errors.and_then(|e| e.content.as_deref());
    let query_errors = errors.and_then(|e| e.query.as_deref());

    let mut html = String::from(PAGE_HEAD);
    html.push_str("<form method=\"post\" action=\"/\">\n");

    html.push_str(&render_errors(content_errors));
    html.push_str("<p><label for=\"id_content\">Content:</label><br>\n");
    html.push_str(&format!(
        "<textarea name=\"content\" id=\"id_content\" rows=\"12\" required>\n{}</textarea></p>\n",
        encode_text(&form.content)
    ));

    html.push_str(&render_errors(query_errors));
    html.push_str("<p><label for=\"id_query\">Query:</label><br>\n");
    html.push_str(&format!(
        "<input type=\"text\" name=\"query\" id=\"id_query\" value=\"{}\" required></p>\n",
        encode_double_quoted_attribute(&form.query)
    ));

    html.push_str("<button type=\"submit\">Ask</button>\n</form>\n");
    html.push_str(&render_result(result));
    html.push_str(PAGE_TAIL);
    html
}

/// Error list for one field, empty when there is nothing to report
pub fn render_errors(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(
            "<ul class=\"errorlist\"><li>{}</li></ul>\n",
            encode_text(message)
        ),
        None => String::new(),
    }
}

/// Result block, omitted for an empty result
pub fn render_result(result: &str) -> String {
    if result.is_empty() {
        return String::new();
    }
    format!(
        "<h2>Result</h2>\n<div class=\"result\">{}</div>\n",
        encode_text(result)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_result_block_snapshot() {
        assert_snapshot!(render_result("Tom & Jerry <3").trim_end(), @r#"
        <h2>Result</h2>
        <div class="result">Tom &amp; Jerry &lt;3</div>
        "#);
    }

    #[test]
    fn test_empty_result_renders_nothing() {
        assert_eq!(render_result(""), "");
    }

    #[test]
    fn test_error_list_snapshot() {
        assert_snapshot!(render_errors(Some("This field is required.")).trim_end(), @r#"<ul class="errorlist"><li>This field is required.</li></ul>"#);
        assert_eq!(render_errors(None), "");
    }

    #[test]
    fn test_index_escapes_form_values() {
        let form = UploadForm::new("</textarea><script>", "\"><img src=x>");
        let html = render_index(&form, None, "");

        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;</textarea>"));
        assert!(html.contains("value=\"&quot;&gt;&lt;img src=x&gt;\""));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("class=\"result\""));
    }

    #[test]
    fn test_textarea_keeps_leading_newline() {
        let html = render_index(&UploadForm::new("\nfirst line", "q"), None, "");
        assert!(html.contains("required>\n\nfirst line</textarea>"));
    }

    #[test]
    fn test_index_shows_field_errors_in_place() {
        let errors = ValidationError {
            content: None,
            query: Some("This field is required.".to_string()),
        };
        let html = render_index(&UploadForm::new("kept text", ""), Some(&errors), "");

        assert!(html.contains(">\nkept text</textarea>"));
        assert_eq!(html.matches("class=\"errorlist\"").count(), 1);
        let error_pos = html.find("class=\"errorlist\"").unwrap();
        let query_pos = html.find("id=\"id_query\"").unwrap();
        let content_pos = html.find("id=\"id_content\"").unwrap();
        assert!(content_pos < error_pos && error_pos < query_pos);
    }
}
