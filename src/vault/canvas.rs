use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::task::{Task, TaskOrigin};
use crate::vault::store::{Vault, VaultError};

/// Error type for canvas operations
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas file not found: {0}")]
    FileNotFound(String),
    #[error("task does not have a canvas origin")]
    NotACanvasTask,
    #[error("canvas text node not found: {0}")]
    NodeNotFound(String),
    #[error("task not found in canvas text node: {0}")]
    TaskNotInNode(String),
    #[error("failed to parse canvas JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// The canvas surface the executors need: remove a task from its node, and
/// drop a task line into some node of a target canvas.
pub trait CanvasTaskUpdater {
    /// Remove the task's line from its text node. An emptied node is removed
    /// from the canvas entirely.
    fn delete_canvas_task(&self, task: &Task) -> Result<(), CanvasError>;

    /// Insert a task line into a canvas file, into the text node holding
    /// `target_section` when given (created on demand), otherwise into a
    /// fresh node.
    fn add_task_line(
        &self,
        target_file: &str,
        line: &str,
        target_section: Option<&str>,
    ) -> Result<(), CanvasError>;
}

// ---------------------------------------------------------------------------
// JSON canvas document model
// ---------------------------------------------------------------------------

/// A `.canvas` document. Unknown top-level and node fields ride along in the
/// flattened maps so a rewrite never loses data the host put there.
#[derive(Debug, Serialize, Deserialize)]
struct CanvasData {
    #[serde(default)]
    nodes: Vec<CanvasNode>,
    #[serde(default)]
    edges: Vec<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CanvasNode {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default)]
    x: i64,
    #[serde(default)]
    y: i64,
    #[serde(default)]
    width: i64,
    #[serde(default)]
    height: i64,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl CanvasNode {
    fn is_text(&self) -> bool {
        self.kind == "text"
    }
}

/// Canvas updater backed by a vault holding JSON canvas files.
pub struct JsonCanvasUpdater<'a> {
    vault: &'a dyn Vault,
}

impl<'a> JsonCanvasUpdater<'a> {
    pub fn new(vault: &'a dyn Vault) -> Self {
        JsonCanvasUpdater { vault }
    }

    fn load(&self, path: &str) -> Result<(crate::vault::store::FileHandle, CanvasData), CanvasError> {
        let file = self
            .vault
            .find_file(path)
            .ok_or_else(|| CanvasError::FileNotFound(path.to_string()))?;
        let content = self.vault.read(&file)?;
        let data: CanvasData = serde_json::from_str(&content)?;
        Ok((file, data))
    }

    fn save(&self, file: &crate::vault::store::FileHandle, data: &CanvasData) -> Result<(), CanvasError> {
        let content = serde_json::to_string_pretty(data)?;
        self.vault.write(file, &content)?;
        Ok(())
    }
}

/// Whether a line reads as a checkbox task.
fn is_task_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("- [") || trimmed.starts_with("* [") || trimmed.starts_with("+ [")
}

/// Fresh node id not colliding with any existing node.
fn new_node_id(nodes: &[CanvasNode]) -> String {
    let mut n = nodes.len() + 1;
    loop {
        let candidate = format!("task-node-{n}");
        if !nodes.iter().any(|node| node.id == candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// New text node placed to the right of the existing layout.
fn new_text_node(nodes: &[CanvasNode], initial_section: Option<&str>) -> CanvasNode {
    let x = nodes
        .iter()
        .map(|node| node.x + node.width)
        .max()
        .map(|max_x| max_x + 50)
        .unwrap_or(0);
    let text = match initial_section {
        Some(section) => format!("## {section}\n\n"),
        None => String::new(),
    };
    CanvasNode {
        id: new_node_id(nodes),
        kind: "text".to_string(),
        text: Some(text),
        x,
        y: 0,
        width: 250,
        height: 60,
        rest: Map::new(),
    }
}

/// Insert a task line into a node's text, honoring an optional section
/// heading inside the node.
fn insert_into_node_text(text: &str, task_line: &str, target_section: Option<&str>) -> String {
    let mut lines: Vec<String> = text.split('\n').map(|l| l.to_string()).collect();

    match target_section {
        Some(section) => {
            let section_lower = section.to_lowercase();
            let anchor = lines.iter().position(|line| {
                let trimmed = line.trim();
                trimmed.starts_with('#') && trimmed.to_lowercase().contains(&section_lower)
            });
            match anchor {
                Some(idx) => {
                    // Land after the heading, past any blank padding.
                    let mut insert = idx + 1;
                    while insert < lines.len() && lines[insert].trim().is_empty() {
                        insert += 1;
                    }
                    lines.insert(insert, task_line.to_string());
                }
                None if text.trim().is_empty() => {
                    lines = vec![format!("## {section}"), task_line.to_string()];
                }
                None => {
                    lines.push(String::new());
                    lines.push(format!("## {section}"));
                    lines.push(task_line.to_string());
                }
            }
        }
        None if text.trim().is_empty() => {
            lines = vec![task_line.to_string()];
        }
        None => {
            lines.push(task_line.to_string());
        }
    }

    lines.join("\n")
}

impl CanvasTaskUpdater for JsonCanvasUpdater<'_> {
    fn delete_canvas_task(&self, task: &Task) -> Result<(), CanvasError> {
        let TaskOrigin::Canvas { file_path, node_id } = &task.origin else {
            return Err(CanvasError::NotACanvasTask);
        };

        let (file, mut data) = self.load(file_path)?;
        let node_idx = data
            .nodes
            .iter()
            .position(|node| node.is_text() && &node.id == node_id)
            .ok_or_else(|| CanvasError::NodeNotFound(node_id.clone()))?;

        let text = data.nodes[node_idx].text.clone().unwrap_or_default();
        let wanted = task.source_line();
        let mut lines: Vec<&str> = text.split('\n').collect();
        let line_idx = lines
            .iter()
            .position(|line| is_task_line(line) && line.trim() == wanted.trim())
            .ok_or_else(|| CanvasError::TaskNotInNode(wanted.clone()))?;
        lines.remove(line_idx);

        let remaining = lines.join("\n");
        if remaining.trim().is_empty() {
            data.nodes.remove(node_idx);
        } else {
            data.nodes[node_idx].text = Some(remaining);
        }

        self.save(&file, &data)
    }

    fn add_task_line(
        &self,
        target_file: &str,
        line: &str,
        target_section: Option<&str>,
    ) -> Result<(), CanvasError> {
        let (file, mut data) = self.load(target_file)?;

        let node_idx = match target_section {
            Some(section) => {
                let section_lower = section.to_lowercase();
                data.nodes.iter().position(|node| {
                    node.is_text()
                        && node
                            .text
                            .as_deref()
                            .is_some_and(|t| t.to_lowercase().contains(&section_lower))
                })
            }
            None => None,
        };

        let node_idx = match node_idx {
            Some(idx) => idx,
            None => {
                let node = new_text_node(&data.nodes, target_section);
                data.nodes.push(node);
                data.nodes.len() - 1
            }
        };

        let text = data.nodes[node_idx].text.clone().unwrap_or_default();
        data.nodes[node_idx].text = Some(insert_into_node_text(&text, line, target_section));

        self.save(&file, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::mem::MemVault;
    use pretty_assertions::assert_eq;

    fn canvas_json(nodes: &[(&str, &str)]) -> String {
        let nodes: Vec<Value> = nodes
            .iter()
            .map(|(id, text)| {
                serde_json::json!({
                    "id": id, "type": "text", "text": text,
                    "x": 0, "y": 0, "width": 250, "height": 60,
                })
            })
            .collect();
        serde_json::json!({"nodes": nodes, "edges": []}).to_string()
    }

    fn canvas_task(file: &str, node: &str, line: &str) -> Task {
        Task {
            id: "c-1".to_string(),
            content: line.trim_start_matches("- [x] ").to_string(),
            origin: TaskOrigin::Canvas {
                file_path: file.to_string(),
                node_id: node.to_string(),
            },
            completed: true,
            status: 'x',
            original_markdown: Some(line.to_string()),
            on_completion: None,
        }
    }

    #[test]
    fn test_delete_removes_only_the_task_line() {
        let vault = MemVault::new().with_file(
            "board.canvas",
            &canvas_json(&[("n1", "## Todo\n- [x] Ship it\n- [ ] Other")]),
        );
        let updater = JsonCanvasUpdater::new(&vault);
        updater
            .delete_canvas_task(&canvas_task("board.canvas", "n1", "- [x] Ship it"))
            .unwrap();

        let data: Value = serde_json::from_str(&vault.content("board.canvas").unwrap()).unwrap();
        assert_eq!(data["nodes"][0]["text"], "## Todo\n- [ ] Other");
    }

    #[test]
    fn test_delete_drops_emptied_node() {
        let vault = MemVault::new().with_file(
            "board.canvas",
            &canvas_json(&[("n1", "- [x] Only task"), ("n2", "keep me")]),
        );
        let updater = JsonCanvasUpdater::new(&vault);
        updater
            .delete_canvas_task(&canvas_task("board.canvas", "n1", "- [x] Only task"))
            .unwrap();

        let data: Value = serde_json::from_str(&vault.content("board.canvas").unwrap()).unwrap();
        let nodes = data["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0]["id"], "n2");
    }

    #[test]
    fn test_delete_missing_node_is_an_error() {
        let vault = MemVault::new().with_file("board.canvas", &canvas_json(&[("n1", "- [x] A")]));
        let updater = JsonCanvasUpdater::new(&vault);
        let err = updater
            .delete_canvas_task(&canvas_task("board.canvas", "ghost", "- [x] A"))
            .unwrap_err();
        assert!(matches!(err, CanvasError::NodeNotFound(_)));
    }

    #[test]
    fn test_delete_missing_file_is_an_error() {
        let vault = MemVault::new();
        let updater = JsonCanvasUpdater::new(&vault);
        let err = updater
            .delete_canvas_task(&canvas_task("board.canvas", "n1", "- [x] A"))
            .unwrap_err();
        assert!(matches!(err, CanvasError::FileNotFound(_)));
    }

    #[test]
    fn test_unknown_fields_survive_rewrite() {
        let raw = r#"{"nodes":[{"id":"n1","type":"text","text":"- [x] A\n- [ ] B","x":1,"y":2,"width":3,"height":4,"color":"2"}],"edges":[],"appVersion":"1.0"}"#;
        let vault = MemVault::new().with_file("board.canvas", raw);
        let updater = JsonCanvasUpdater::new(&vault);
        updater
            .delete_canvas_task(&canvas_task("board.canvas", "n1", "- [x] A"))
            .unwrap();

        let data: Value = serde_json::from_str(&vault.content("board.canvas").unwrap()).unwrap();
        assert_eq!(data["appVersion"], "1.0");
        assert_eq!(data["nodes"][0]["color"], "2");
    }

    #[test]
    fn test_add_task_line_into_section_node() {
        let vault = MemVault::new().with_file(
            "board.canvas",
            &canvas_json(&[("n1", "## High Priority\n\n- [ ] Existing")]),
        );
        let updater = JsonCanvasUpdater::new(&vault);
        updater
            .add_task_line("board.canvas", "- [x] Moved in", Some("High Priority"))
            .unwrap();

        let data: Value = serde_json::from_str(&vault.content("board.canvas").unwrap()).unwrap();
        assert_eq!(
            data["nodes"][0]["text"],
            "## High Priority\n\n- [x] Moved in\n- [ ] Existing"
        );
    }

    #[test]
    fn test_add_task_line_creates_node_when_section_missing() {
        let vault = MemVault::new().with_file("board.canvas", &canvas_json(&[("n1", "notes")]));
        let updater = JsonCanvasUpdater::new(&vault);
        updater
            .add_task_line("board.canvas", "- [x] New", Some("Done"))
            .unwrap();

        let data: Value = serde_json::from_str(&vault.content("board.canvas").unwrap()).unwrap();
        let nodes = data["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1]["text"], "## Done\n- [x] New");
        // Placed clear of the existing layout.
        assert_eq!(nodes[1]["x"], 300);
    }

    #[test]
    fn test_add_task_line_without_section_appends_fresh_node() {
        let vault = MemVault::new().with_file("board.canvas", r#"{"nodes":[],"edges":[]}"#);
        let updater = JsonCanvasUpdater::new(&vault);
        updater.add_task_line("board.canvas", "- [x] New", None).unwrap();

        let data: Value = serde_json::from_str(&vault.content("board.canvas").unwrap()).unwrap();
        assert_eq!(data["nodes"][0]["text"], "- [x] New");
    }
}
