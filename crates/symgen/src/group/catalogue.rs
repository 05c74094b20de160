//! Built-in groups in their standard settings, keyed by Hermann–Mauguin name.
//!
//! Each entry lists generator symbols; `lookup` expands them with
//! `SpaceGroup::from_generators`. The plane table is complete; the space
//! table is a sample covering each crystal family and the usual centerings.

use super::{GroupError, SpaceGroup};

type Entry = (&'static str, &'static [&'static str]);

const PLANE: &[Entry] = &[
    ("p1", &["x,y"]),
    ("p2", &["-x,-y"]),
    ("pm", &["-x,y"]),
    ("pg", &["-x,y+1/2"]),
    ("cm", &["-x,y", "x+1/2,y+1/2"]),
    ("p2mm", &["-x,-y", "-x,y"]),
    ("p2mg", &["-x,-y", "-x+1/2,y"]),
    ("p2gg", &["-x,-y", "-x+1/2,y+1/2"]),
    ("c2mm", &["-x,-y", "-x,y", "x+1/2,y+1/2"]),
    ("p4", &["-y,x"]),
    ("p4mm", &["-y,x", "-x,y"]),
    ("p4gm", &["-y,x", "-x+1/2,y+1/2"]),
    ("p3", &["-y,x-y"]),
    ("p3m1", &["-y,x-y", "-y,-x"]),
    ("p31m", &["-y,x-y", "y,x"]),
    ("p6", &["x-y,x"]),
    ("p6mm", &["x-y,x", "-y,-x"]),
];

const SPACE: &[Entry] = &[
    ("P1", &["x,y,z"]),
    ("P-1", &["-x,-y,-z"]),
    ("P21/c", &["-x,y+1/2,-z+1/2", "-x,-y,-z"]),
    ("C2/c", &["-x,y,-z+1/2", "-x,-y,-z", "x+1/2,y+1/2,z"]),
    ("P212121", &["-x+1/2,-y,z+1/2", "-x,y+1/2,-z+1/2"]),
    ("P6/mmm", &["-y,x-y,z", "-x,-y,z", "y,x,-z", "-x,-y,-z"]),
    ("R-3m", &["-y,x-y,z", "y,x,-z", "-x,-y,-z", "x+2/3,y+1/3,z+1/3"]),
    ("Pm-3m", &["z,x,y", "-y,x,z", "-x,-y,-z"]),
    ("Im-3m", &["z,x,y", "-y,x,z", "-x,-y,-z", "x+1/2,y+1/2,z+1/2"]),
    ("Fm-3m", &["z,x,y", "-y,x,z", "-x,-y,-z", "x,y+1/2,z+1/2", "x+1/2,y,z+1/2"]),
];

fn table(dimension: usize) -> &'static [Entry] {
    match dimension {
        2 => PLANE,
        3 => SPACE,
        _ => &[],
    }
}

/// Names in table order; empty for unsupported dimensions.
pub fn names(dimension: usize) -> Vec<&'static str> {
    table(dimension).iter().map(|(name, _)| *name).collect()
}

/// Generator symbols of a catalogue entry.
pub fn generator_symbols(dimension: usize, name: &str) -> Option<&'static [&'static str]> {
    table(dimension)
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, symbols)| *symbols)
}

/// Build the named group.
pub fn lookup(dimension: usize, name: &str) -> Result<SpaceGroup, GroupError> {
    let symbols = generator_symbols(dimension, name).ok_or_else(|| GroupError::UnknownGroup {
        dimension,
        name: name.to_string(),
    })?;
    SpaceGroup::from_symbols(dimension, symbols)
}
