//! Review prompt construction.

use crate::models::{CandidateLevel, FileSet};

/// Render the files, assignment description, and candidate level into the
/// instruction string sent to the model.
///
/// Deterministic given its inputs; files are rendered in [`FileSet`] order.
/// No truncation is applied — a repository large enough to exceed the
/// provider's input limit surfaces as a generation error.
pub fn build_review_prompt(files: &FileSet, description: &str, level: CandidateLevel) -> String {
    let mut prompt = format!(
        "You are reviewing a coding assignment submitted by a '{level}' level candidate. \
         Judge the code against expectations for that level.\n\nCode files:\n"
    );

    for (path, content) in files.iter() {
        prompt.push_str(&format!("File: {path}\n{content}\n\n"));
    }

    prompt.push_str(&format!("Assignment: {description}\n\n"));

    prompt.push_str(
        "Provide your feedback as downsides/comments, a rating out of 10, and a conclusion.\n\
         Respond with a single JSON object using exactly this schema:\n\
         {\n\
         \"Downsides/Comments\": [\"<one discrete comment per entry>\"],\n\
         \"Rating\": \"<score>/10\",\n\
         \"Conclusion\": \"<overall conclusion>\"\n\
         }\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> FileSet {
        [
            ("src/app.py", "def handler():\n    return 42\n"),
            ("README.md", "# assignment"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn includes_level_files_and_description() {
        let prompt = build_review_prompt(&files(), "Build a REST API", CandidateLevel::Middle);

        assert!(prompt.contains("'Middle' level candidate"));
        assert!(prompt.contains("File: src/app.py"));
        assert!(prompt.contains("def handler():"));
        assert!(prompt.contains("File: README.md"));
        assert!(prompt.contains("Assignment: Build a REST API"));
    }

    #[test]
    fn names_the_output_fields() {
        let prompt = build_review_prompt(&files(), "x", CandidateLevel::Junior);
        assert!(prompt.contains("\"Downsides/Comments\""));
        assert!(prompt.contains("\"Rating\""));
        assert!(prompt.contains("\"Conclusion\""));
        assert!(prompt.contains("/10"));
    }

    #[test]
    fn renders_files_in_fileset_order() {
        let prompt = build_review_prompt(&files(), "x", CandidateLevel::Senior);
        let app = prompt.find("File: src/app.py").unwrap();
        let readme = prompt.find("File: README.md").unwrap();
        assert!(app < readme);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let a = build_review_prompt(&files(), "desc", CandidateLevel::Junior);
        let b = build_review_prompt(&files(), "desc", CandidateLevel::Junior);
        assert_eq!(a, b);
    }
}
