use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use flowdraft_dto::{DraftSpec, TaskDocument, TemplateGraph};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Template id must not be empty")]
    EmptyTemplateId,

    #[error("Task at position {0} has an empty id")]
    EmptyTaskId(usize),

    #[error("Task id '{0}' is used more than once")]
    DuplicateTask(String),

    #[error("Graph references unknown task '{0}'")]
    UnknownTask(String),

    #[error("Graph contains a cycle through task '{0}'")]
    Cycle(String),
}

/// Borrowed view of a draft request that passed validation.
#[derive(Debug)]
pub struct ValidDraft<'a> {
    pub title: &'a str,
    pub graph: &'a TemplateGraph,
    pub tasks: &'a [TaskDocument],
}

pub fn validate_draft(spec: &DraftSpec) -> Result<ValidDraft<'_>, ValidationError> {
    if matches!(spec.id.as_deref(), Some(id) if id.trim().is_empty()) {
        return Err(ValidationError::EmptyTemplateId);
    }
    let title = spec
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::MissingField("title"))?;
    let graph = spec.graph.as_ref().ok_or(ValidationError::MissingField("graph"))?;
    let tasks = spec.tasks.as_deref().ok_or(ValidationError::MissingField("tasks"))?;

    let mut ids = HashSet::with_capacity(tasks.len());
    for (pos, task) in tasks.iter().enumerate() {
        if task.id.is_empty() {
            return Err(ValidationError::EmptyTaskId(pos));
        }
        if !ids.insert(task.id.as_str()) {
            return Err(ValidationError::DuplicateTask(task.id.clone()));
        }
    }

    for (from, successors) in graph {
        for id in std::iter::once(from).chain(successors) {
            if !ids.contains(id.as_str()) {
                return Err(ValidationError::UnknownTask(id.clone()));
            }
        }
    }

    check_acyclic(graph)?;
    Ok(ValidDraft { title, graph, tasks })
}

// Kahn 拓扑排序，剩余节点即在环上
fn check_acyclic(graph: &TemplateGraph) -> Result<(), ValidationError> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    for (from, successors) in graph {
        in_degree.entry(from.as_str()).or_insert(0);
        for to in successors {
            *in_degree.entry(to.as_str()).or_insert(0) += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(n, _)| *n)
        .collect();
    let mut visited = 0usize;
    while let Some(node) = queue.pop_front() {
        visited += 1;
        for to in graph.get(node).into_iter().flatten() {
            if let Some(d) = in_degree.get_mut(to.as_str()) {
                *d -= 1;
                if *d == 0 {
                    queue.push_back(to.as_str());
                }
            }
        }
    }

    if visited == in_degree.len() {
        return Ok(());
    }
    let stuck: BTreeSet<&str> = in_degree
        .into_iter()
        .filter(|(_, d)| *d > 0)
        .map(|(n, _)| n)
        .collect();
    let first = stuck.into_iter().next().unwrap_or_default();
    Err(ValidationError::Cycle(first.to_string()))
}
