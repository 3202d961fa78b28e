use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::model::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Notes,
}

/// A search hit with the byte ranges of every match, for caller-side
/// highlighting
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub task_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Build a case-insensitive literal matcher for a query.
/// Returns `None` for a blank query, which matches everything.
fn build_matcher(query: &str) -> Option<Regex> {
    if query.trim().is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Collect all non-overlapping match byte-ranges in the given text
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

fn task_matches(task: &Task, re: &Regex) -> bool {
    re.is_match(&task.title) || re.is_match(&task.notes)
}

/// Filter tasks by a case-insensitive substring match against title or
/// notes. A blank query passes everything. Input order is preserved.
pub fn search_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    match build_matcher(query) {
        Some(re) => tasks.iter().filter(|t| task_matches(t, &re)).collect(),
        None => tasks.iter().collect(),
    }
}

/// Search with per-field match spans. Blank queries produce no hits.
pub fn search_hits(tasks: &[Task], query: &str) -> Vec<SearchHit> {
    let Some(re) = build_matcher(query) else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for task in tasks {
        let spans = find_matches(&re, &task.title);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id.clone(),
                field: MatchField::Title,
                spans,
            });
        }
        let spans = find_matches(&re, &task.notes);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id.clone(),
                field: MatchField::Notes,
                spans,
            });
        }
    }
    hits
}
