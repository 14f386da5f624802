//! Tests for response postprocessing through the public API

use meta_critique::critique::{
    html_escape, postprocess_completion, render_full_rewrite, CritiqueResponse, RewriteSuggestion,
};

#[test]
fn test_spec_example_round_trip() {
    let raw = "Feedback looks fine.\n```json\n{\"rewrite_suggestions\": []}\n```";
    let result = postprocess_completion(raw, "Sam").unwrap();
    assert_eq!(
        result,
        CritiqueResponse {
            meta_feedback: "Feedback looks fine.".to_string(),
            rewrite_suggestions: vec![],
            full_rewrite: String::new(),
        }
    );
}

#[test]
fn test_n_suggestions_produce_n_list_items() {
    for n in [1usize, 3, 7] {
        let suggestions: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    "{{\"bad_phrase\": \"p{}\", \"suggested_rewrite\": \"rewrite {}\"}}",
                    i, i
                )
            })
            .collect();
        let raw = format!(
            "Body text.\n```json\n{{\"rewrite_suggestions\": [{}]}}\n```",
            suggestions.join(",")
        );

        let result = postprocess_completion(&raw, "Sam").unwrap();
        assert_eq!(result.rewrite_suggestions.len(), n);
        assert_eq!(result.full_rewrite.matches("<li>").count(), n);
        for i in 0..n {
            assert!(result
                .full_rewrite
                .contains(&format!("<li>rewrite {}</li>", i)));
        }
    }
}

#[test]
fn test_no_block_returns_whole_text() {
    let raw = "Just a Markdown critique with **bold** text.";
    let result = postprocess_completion(raw, "Sam").unwrap();
    assert_eq!(result.meta_feedback, raw);
    assert!(result.rewrite_suggestions.is_empty());
    assert!(result.full_rewrite.is_empty());
}

#[test]
fn test_serialized_wire_shape() {
    let raw = concat!(
        "Body.\n```json\n",
        "{\"rewrite_suggestions\": [{\"bad_phrase\": \"meh\", \"suggested_rewrite\": \"better\"}]}\n",
        "```"
    );
    let result = postprocess_completion(raw, "Sam").unwrap();
    let wire: serde_json::Value = serde_json::to_value(&result).unwrap();

    assert_eq!(wire["meta_feedback"], "Body.");
    assert_eq!(wire["rewrite_suggestions"][0]["bad_phrase"], "meh");
    assert_eq!(wire["rewrite_suggestions"][0]["suggested_rewrite"], "better");
    assert!(wire["full_rewrite"].as_str().unwrap().contains("<ul>"));
}

#[test]
fn test_rewrite_document_is_self_contained() {
    let suggestions = vec![RewriteSuggestion {
        bad_phrase: "bad".to_string(),
        suggested_rewrite: "good".to_string(),
    }];
    let doc = render_full_rewrite("Sam", &suggestions);
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("<title>Rewrite Suggestions for Sam</title>"));
    assert!(doc.trim_end().ends_with("</html>"));
}

#[test]
fn test_escape_round_trip_of_suggestion_text() {
    let suggestions = vec![RewriteSuggestion {
        bad_phrase: "x".to_string(),
        suggested_rewrite: "say \"5 < 10\" & move on".to_string(),
    }];
    let doc = render_full_rewrite("Sam", &suggestions);
    assert!(doc.contains("<li>say &quot;5 &lt; 10&quot; &amp; move on</li>"));
    assert_eq!(
        html_escape("say \"5 < 10\" & move on"),
        "say &quot;5 &lt; 10&quot; &amp; move on"
    );
}

#[test]
fn test_malformed_block_never_defaults_to_empty_list() {
    let raw = "Body.\n```json\n{\"rewrite_suggestions\": \"not an array\"}\n```";
    assert!(postprocess_completion(raw, "Sam").is_err());
}
