//! SQLite feature source (feature `sqlite`).
//!
//! # Schema
//!
//! ```sql
//! features (fid INTEGER PRIMARY KEY, id TEXT, point_a TEXT, point_b TEXT,
//!           point_c TEXT, kind TEXT, direction TEXT, speed REAL,
//!           min_x REAL, min_y REAL, max_x REAL, max_y REAL)
//! vertices (fid INTEGER, part INTEGER, seq INTEGER, x REAL, y REAL)
//! ```
//!
//! `fetch` selects features whose stored envelope intersects the query box
//! (ordered by `fid`, i.e. insertion order) and reassembles their geometry
//! from `vertices`.  Any database error surfaces as
//! [`FetchError::Transport`], which aborts the routing request.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::debug;

use sp_core::{BoundingBox, Direction, ProjectedPoint};
use sp_network::{Feature, FeatureAttributes, Geometry};
use sp_route::{FeatureSource, FetchError};

use crate::{SourceError, SourceResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS features (
        fid       INTEGER PRIMARY KEY,
        id        TEXT    NOT NULL,
        point_a   TEXT    NOT NULL DEFAULT '',
        point_b   TEXT    NOT NULL DEFAULT '',
        point_c   TEXT    NOT NULL DEFAULT '',
        kind      TEXT    NOT NULL,
        direction TEXT,
        speed     REAL,
        min_x     REAL    NOT NULL,
        min_y     REAL    NOT NULL,
        max_x     REAL    NOT NULL,
        max_y     REAL    NOT NULL
    );
    CREATE TABLE IF NOT EXISTS vertices (
        fid  INTEGER NOT NULL REFERENCES features(fid),
        part INTEGER NOT NULL,
        seq  INTEGER NOT NULL,
        x    REAL    NOT NULL,
        y    REAL    NOT NULL
    );
    CREATE INDEX IF NOT EXISTS features_envelope ON features (min_x, max_x, min_y, max_y);
    CREATE INDEX IF NOT EXISTS vertices_fid ON vertices (fid, part, seq);";

/// Feature store in an SQLite database.
///
/// The connection sits behind a `Mutex` so one source can serve concurrent
/// routing requests.
pub struct SqliteSource {
    conn: Mutex<Connection>,
}

impl SqliteSource {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> SourceResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Wrap an existing connection, creating the tables if missing.
    pub fn from_connection(conn: Connection) -> SourceResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Store `features` in one transaction.  Features without coordinates
    /// are skipped.  Returns the number stored.
    pub fn insert_features(&self, features: &[Feature]) -> SourceResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut stored = 0;
        {
            let mut insert_feature = tx.prepare_cached(
                "INSERT INTO features \
                 (id, point_a, point_b, point_c, kind, direction, speed, min_x, min_y, max_x, max_y) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            let mut insert_vertex = tx.prepare_cached(
                "INSERT INTO vertices (fid, part, seq, x, y) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for f in features {
                let Some(b) = f.bbox() else { continue };
                let a = &f.attributes;
                insert_feature.execute(params![
                    a.id,
                    a.point_a,
                    a.point_b,
                    a.point_c,
                    f.geometry.kind(),
                    f.direction.map(Direction::as_str),
                    f.speed,
                    b.min_x,
                    b.min_y,
                    b.max_x,
                    b.max_y,
                ])?;
                let fid = tx.last_insert_rowid();
                for (part, coords) in geometry_parts(&f.geometry).into_iter().enumerate() {
                    for (seq, p) in coords.iter().enumerate() {
                        insert_vertex.execute(params![fid, part as i64, seq as i64, p.x, p.y])?;
                    }
                }
                stored += 1;
            }
        }
        tx.commit()?;
        Ok(stored)
    }

    /// Number of stored features.
    pub fn count(&self) -> SourceResult<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM features", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Features whose envelope intersects `bbox`, in insertion order.
    pub fn query(&self, bbox: &BoundingBox) -> SourceResult<Vec<Feature>> {
        let conn = self.lock()?;
        let mut select = conn.prepare_cached(
            "SELECT fid, id, point_a, point_b, point_c, kind, direction, speed FROM features \
             WHERE min_x <= ?3 AND max_x >= ?1 AND min_y <= ?4 AND max_y >= ?2 \
             ORDER BY fid",
        )?;
        let mut vertices = conn.prepare_cached(
            "SELECT part, x, y FROM vertices WHERE fid = ?1 ORDER BY part, seq",
        )?;

        let rows = select.query_map(params![bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y], |row| {
            Ok(FeatureRow {
                fid:       row.get(0)?,
                id:        row.get(1)?,
                point_a:   row.get(2)?,
                point_b:   row.get(3)?,
                point_c:   row.get(4)?,
                kind:      row.get(5)?,
                direction: row.get(6)?,
                speed:     row.get(7)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            let row = row?;
            let mut parts: Vec<Vec<ProjectedPoint>> = Vec::new();
            let verts = vertices.query_map(params![row.fid], |v| {
                Ok((v.get::<_, i64>(0)?, v.get::<_, f64>(1)?, v.get::<_, f64>(2)?))
            })?;
            for v in verts {
                let (part, x, y) = v?;
                let part = part as usize;
                if parts.len() <= part {
                    parts.resize_with(part + 1, Vec::new);
                }
                parts[part].push(ProjectedPoint::new(x, y));
            }
            out.push(row.into_feature(parts)?);
        }
        debug!(%bbox, features = out.len(), "sqlite query");
        Ok(out)
    }

    fn lock(&self) -> SourceResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SourceError::Unavailable("SQLite connection mutex poisoned".into()))
    }
}

impl FeatureSource for SqliteSource {
    fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<Feature>, FetchError> {
        self.query(bbox).map_err(|e| FetchError::Transport(e.to_string()))
    }
}

// ── Row mapping ───────────────────────────────────────────────────────────────

struct FeatureRow {
    fid:       i64,
    id:        String,
    point_a:   String,
    point_b:   String,
    point_c:   String,
    kind:      String,
    direction: Option<String>,
    speed:     Option<f64>,
}

impl FeatureRow {
    fn into_feature(self, mut parts: Vec<Vec<ProjectedPoint>>) -> SourceResult<Feature> {
        let geometry = match self.kind.as_str() {
            "Point" => match parts.first().and_then(|p| p.first()) {
                Some(&p) => Geometry::Point(p),
                None => return Err(SourceError::Parse(format!("point feature {:?} has no vertex", self.id))),
            },
            "LineString" => Geometry::LineString(if parts.is_empty() { Vec::new() } else { parts.remove(0) }),
            "MultiLineString" => Geometry::MultiLineString(parts),
            "Polygon" => Geometry::Polygon(parts),
            other => {
                return Err(SourceError::Parse(format!(
                    "feature {:?} has unknown geometry kind {other:?}",
                    self.id
                )));
            }
        };
        let direction = crate::loader::parse_direction(self.direction.as_deref(), &self.id)?;
        Ok(Feature {
            geometry,
            attributes: FeatureAttributes {
                id:      self.id,
                point_a: self.point_a,
                point_b: self.point_b,
                point_c: self.point_c,
            },
            direction,
            speed: self.speed,
        })
    }
}

fn geometry_parts(geometry: &Geometry) -> Vec<&[ProjectedPoint]> {
    match geometry {
        Geometry::Point(p) => vec![std::slice::from_ref(p)],
        Geometry::LineString(c) => vec![c.as_slice()],
        Geometry::MultiLineString(parts) | Geometry::Polygon(parts) => {
            parts.iter().map(Vec::as_slice).collect()
        }
    }
}
