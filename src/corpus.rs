// File: src/corpus.rs
//! Reader for SENSEVAL-style lexical-sample corpora:
//!
//! ```text
//! <instance id="line-n.w9_10:6830:" docsrc="...">
//! <answer instance="line-n.w9_10:6830:" senseid="phone"/>
//! <context>
//! <s> ... <head>line</head> ... </s>
//! </context>
//! </instance>
//! ```
//!
//! Records are parsed first and filtered after; a bad record yields an error
//! in its slot and never stops the rest of the file from being read.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{Result, WsdError};

const INSTANCE_END: &str = "</instance>";
const INSTANCE_TAG: &str = "<instance";

static INSTANCE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<instance\b[^>]*?\bid\s*=\s*"([^"]*)""#).unwrap());
static SENSE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<answer\b[^>]*?\bsenseid\s*=\s*"([^"]*)""#).unwrap());
static CONTEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<context>(.*?)</context>").unwrap());

/// An answer record: `<answer instance="ID" senseid="SENSE"/>`.
pub(crate) static ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<answer\s+instance\s*=\s*"([^"]*)"\s+senseid\s*=\s*"([^"]*)"\s*/?>$"#).unwrap()
});

/// Whether records are expected to carry a gold sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Labeling {
    Labeled,
    Unlabeled,
}

/// One corpus record before tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstance {
    pub id: String,
    pub sense: Option<String>,
    /// Body of the `<context>` element, markup included.
    pub context: String,
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| WsdError::io(format!("reading {}", path.display()), e))
}

/// Splits a corpus into records, in file order.
pub fn parse(text: &str, labeling: Labeling) -> Vec<Result<RawInstance>> {
    text.split(INSTANCE_END)
        .filter(|chunk| chunk.contains(INSTANCE_TAG))
        .enumerate()
        .map(|(ordinal, chunk)| parse_record(ordinal, chunk, labeling))
        .collect()
}

fn parse_record(ordinal: usize, chunk: &str, labeling: Labeling) -> Result<RawInstance> {
    let id = capture(&INSTANCE_ID, chunk)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| WsdError::malformed(format!("#{}", ordinal + 1), "missing instance id"))?;

    let sense = match labeling {
        Labeling::Labeled => {
            let sense = capture(&SENSE_ID, chunk)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| WsdError::malformed(&id, "missing senseid"))?;
            Some(sense.to_string())
        }
        Labeling::Unlabeled => None,
    };

    let context = capture(&CONTEXT, chunk)
        .ok_or_else(|| WsdError::malformed(&id, "missing <context> element"))?;

    Ok(RawInstance {
        id,
        sense,
        context: context.trim().to_string(),
    })
}

/// First capture group of the first match.
fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = r#"<corpus lang="en">
<lexelt item="line-n">
<instance id="line-n.w9_10:6830:" docsrc = "wsj">
<answer instance="line-n.w9_10:6830:" senseid="phone"/>
<context>
<s> Please hold the <head>line</head>. </s>
</context>
</instance>
<instance id="line-n.w8_059:8174:" docsrc = "wsj">
<answer instance="line-n.w8_059:8174:" senseid="product"/>
<context>
<s> A new <head>lines</head> of shoes. </s>
</context>
</instance>
<instance id="broken">
<answer instance="broken" senseid="phone"/>
</instance>
</lexelt>
</corpus>
"#;

    #[test]
    fn parses_labeled_records_in_order() {
        let records = parse(CORPUS, Labeling::Labeled);
        assert_eq!(records.len(), 3);

        let first = records[0].as_ref().unwrap();
        assert_eq!(first.id, "line-n.w9_10:6830:");
        assert_eq!(first.sense.as_deref(), Some("phone"));
        assert_eq!(first.context, "<s> Please hold the <head>line</head>. </s>");

        let second = records[1].as_ref().unwrap();
        assert_eq!(second.sense.as_deref(), Some("product"));

        let err = records[2].as_ref().unwrap_err();
        assert!(matches!(err, WsdError::MalformedInstance { id, .. } if id == "broken"));
    }

    #[test]
    fn unlabeled_records_ignore_answers() {
        let records = parse(CORPUS, Labeling::Unlabeled);
        assert!(records[0].as_ref().unwrap().sense.is_none());
    }

    #[test]
    fn labeled_record_without_sense_is_malformed() {
        let text = "<instance id=\"x1\">\n<context>\n<s> <head>line</head> </s>\n</context>\n</instance>";
        let records = parse(text, Labeling::Labeled);
        assert!(records[0].as_ref().unwrap_err().is_recoverable());
        assert!(parse(text, Labeling::Unlabeled)[0].is_ok());
    }

    #[test]
    fn id_patterns_stay_inside_their_tag() {
        let chunk = r#"<instance id="x1" docsrc="wsj">
<answer instance="x1" senseid="phone"/>"#;
        assert_eq!(capture(&INSTANCE_ID, chunk), Some("x1"));
        assert_eq!(capture(&SENSE_ID, chunk), Some("phone"));
        assert_eq!(capture(&INSTANCE_ID, r#"<answer instance="x1" senseid="phone"/>"#), None);
    }

    #[test]
    fn answer_records_need_both_attributes() {
        let cap = ANSWER
            .captures(r#"<answer instance="line-n.1:" senseid="phone"/>"#)
            .unwrap();
        assert_eq!(&cap[1], "line-n.1:");
        assert_eq!(&cap[2], "phone");
        assert!(!ANSWER.is_match(r#"<answer instance="line-n.1:"/>"#));
        assert!(!ANSWER.is_match("garbage"));
    }
}
