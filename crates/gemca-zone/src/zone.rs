//! Zones: named regions with a medium.

use std::fmt;

use gemca_csg::CsgTree;
use serde::{Deserialize, Serialize};

/// 1-based zone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

impl ZoneId {
    /// Position of the zone in the workspace zone list; `None` for zone 0,
    /// which no zone carries.
    pub fn index(self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A region of space defined by a boolean expression over bodies.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Zone number.
    pub id: ZoneId,
    /// User-given name.
    pub name: String,
    /// Material filling the zone.
    pub medium: u32,
    /// Expression as written by the user.
    pub expression: String,
    /// Compiled expression.
    pub tree: CsgTree,
    /// Source line the zone started on, 0 if not from a file.
    pub line: usize,
}

impl Zone {
    /// A zone with medium 0.
    pub fn new(id: ZoneId, name: impl Into<String>, expression: impl Into<String>, tree: CsgTree) -> Self {
        Self {
            id,
            name: name.into(),
            medium: 0,
            expression: expression.into(),
            tree,
            line: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id_index() {
        assert_eq!(ZoneId(1).index(), Some(0));
        assert_eq!(ZoneId(7).index(), Some(6));
        assert_eq!(ZoneId(0).index(), None);
    }
}
