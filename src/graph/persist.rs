use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GraphError, PersistError, Result};
use crate::geometry::Point;

use super::{Graph, SegmentData};

/// Storage key the editor saves its graph under.
pub const STORAGE_KEY: &str = "graph";

/// Serialized form of a segment: endpoints by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub p1: Point,
    pub p2: Point,
    #[serde(default)]
    pub control_point: Option<Point>,
    #[serde(default)]
    pub curve: bool,
}

/// Serialized form of a whole graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub points: Vec<Point>,
    pub segments: Vec<SegmentRecord>,
}

impl Graph {
    /// Snapshots the graph into its serializable form.
    #[must_use]
    pub fn to_record(&self) -> GraphRecord {
        GraphRecord {
            points: self.points().map(|(_, p)| p).collect(),
            segments: self
                .segments()
                .map(|(_, s)| SegmentRecord {
                    p1: s.p1,
                    p2: s.p2,
                    control_point: s.control_point,
                    curve: s.curve,
                })
                .collect(),
        }
    }

    /// Rebuilds a graph from its serialized form.
    ///
    /// Segment endpoints are matched back to the record's points by exact
    /// coordinates. Duplicate points and duplicate or degenerate segments are
    /// dropped the same way live edits drop them.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnresolvedPoint` if a segment endpoint is not in
    /// the record's point list.
    pub fn from_record(record: &GraphRecord) -> Result<Self> {
        let mut graph = Self::new();
        for &p in &record.points {
            if graph.try_add_point(p).is_none() {
                warn!(x = p.x, y = p.y, "duplicate point in graph record");
            }
        }
        for seg in &record.segments {
            let resolve = |p: &Point| {
                graph
                    .find_point(p)
                    .ok_or(GraphError::UnresolvedPoint { x: p.x, y: p.y })
            };
            let p1 = resolve(&seg.p1)?;
            let p2 = resolve(&seg.p2)?;
            let added = graph.insert_segment(SegmentData {
                p1,
                p2,
                control_point: seg.control_point,
                curve: seg.curve,
            })?;
            if added.is_none() {
                warn!("duplicate or degenerate segment in graph record");
            }
        }
        debug!(
            points = graph.point_count(),
            segments = graph.segment_count(),
            "graph loaded"
        );
        Ok(graph)
    }

    /// Serializes the graph as JSON.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_record()).map_err(|e| PersistError::Json(e).into())
    }

    /// Parses a graph from JSON.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Json` for malformed input and
    /// `GraphError::UnresolvedPoint` for dangling segment endpoints.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: GraphRecord = serde_json::from_str(json).map_err(PersistError::Json)?;
        Self::from_record(&record)
    }
}

/// A string key-value store, the persistence seam of the editor.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Io` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Io` if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Saves `graph` under [`STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails.
    fn save_graph(&mut self, graph: &Graph) -> Result<()> {
        self.set(STORAGE_KEY, &graph.to_json()?)
    }

    /// Loads the graph saved under [`STORAGE_KEY`], or an empty graph if
    /// nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the saved data is malformed.
    fn load_graph(&self) -> Result<Graph> {
        match self.get(STORAGE_KEY)? {
            Some(json) => Graph::from_json(&json),
            None => Ok(Graph::new()),
        }
    }
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Io(e).into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(PersistError::Io)?;
        fs::write(self.path(key), value).map_err(PersistError::Io)?;
        Ok(())
    }
}
