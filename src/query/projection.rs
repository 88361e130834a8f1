use serde_json::{Map, Value};

use crate::domain::value_objects::FieldPath;
use crate::query::errors::QueryParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectionMode {
    Include,
    Exclude,
}

/// Parsed projection document (`{_id: 0, title: 1, author: 1}`)
///
/// Either an inclusion list or an exclusion list; `_id` may be suppressed
/// alongside either mode, matching the source statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    mode: ProjectionMode,
    fields: Vec<FieldPath>,
    include_id: bool,
}

impl Projection {
    pub fn parse(projection_doc: &Value) -> Result<Self, QueryParseError> {
        let entries = projection_doc
            .as_object()
            .ok_or(QueryParseError::NotADocument("projection document"))?;

        let mut mode: Option<ProjectionMode> = None;
        let mut fields = Vec::new();
        let mut include_id = true;

        for (key, value) in entries {
            let included = projection_flag(key, value)?;

            if key == "_id" {
                include_id = included;
                continue;
            }

            let field_mode = if included {
                ProjectionMode::Include
            } else {
                ProjectionMode::Exclude
            };

            match mode {
                None => mode = Some(field_mode),
                Some(existing) if existing != field_mode => {
                    return Err(QueryParseError::MixedProjection);
                }
                Some(_) => {}
            }

            fields.push(FieldPath::new(key)?);
        }

        // An empty or id-only projection excludes nothing
        let mode = mode.unwrap_or(ProjectionMode::Exclude);
        Ok(Self {
            mode,
            fields,
            include_id,
        })
    }

    /// Apply to a rendered document, producing the projected document.
    pub fn apply(&self, document: &Value) -> Value {
        let Some(source) = document.as_object() else {
            return document.clone();
        };

        match self.mode {
            ProjectionMode::Include => {
                let mut projected = Map::new();
                if self.include_id {
                    if let Some(id) = source.get("_id") {
                        projected.insert("_id".to_string(), id.clone());
                    }
                }
                for path in &self.fields {
                    if let Some(value) = path.resolve(document) {
                        insert_at_path(&mut projected, path, value.clone());
                    }
                }
                Value::Object(projected)
            }
            ProjectionMode::Exclude => {
                let mut projected = source.clone();
                if !self.include_id {
                    projected.remove("_id");
                }
                for path in &self.fields {
                    remove_at_path(&mut projected, path.segments());
                }
                Value::Object(projected)
            }
        }
    }
}

fn projection_flag(key: &str, value: &Value) -> Result<bool, QueryParseError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(false),
        Value::Number(n) if n.as_f64() == Some(1.0) => Ok(true),
        _ => Err(QueryParseError::InvalidProjectionValue(key.to_string())),
    }
}

fn insert_at_path(target: &mut Map<String, Value>, path: &FieldPath, value: Value) {
    let segments = path.segments();
    let mut current = target;
    for segment in &segments[..segments.len() - 1] {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry.as_object_mut() {
            Some(nested) => current = nested,
            // An overlapping include already claimed this segment with a
            // scalar; the broader path wins
            None => return,
        }
    }
    current.insert(segments[segments.len() - 1].clone(), value);
}

fn remove_at_path(target: &mut Map<String, Value>, segments: &[String]) {
    match segments {
        [] => {}
        [last] => {
            target.remove(last);
        }
        [head, rest @ ..] => {
            if let Some(Value::Object(nested)) = target.get_mut(head) {
                remove_at_path(nested, rest);
            }
        }
    }
}
