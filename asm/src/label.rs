use indexmap::IndexMap;

use crate::error::Error;

// ----------------------------------------------------------------------------
// Label table

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Data,
    Code,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    Default,
    Extern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub value: u32,
    pub kind: LabelKind,
    pub linkage: Linkage,
    /// Line of the definition in the expanded source.
    pub line: usize,
}

impl Label {
    pub fn code(value: u32, line: usize) -> Self {
        Label {
            value,
            kind: LabelKind::Code,
            linkage: Linkage::Default,
            line,
        }
    }

    pub fn data(value: u32, line: usize) -> Self {
        Label {
            value,
            kind: LabelKind::Data,
            linkage: Linkage::Default,
            line,
        }
    }

    pub fn external(line: usize) -> Self {
        Label {
            value: 0,
            kind: LabelKind::External,
            linkage: Linkage::Extern,
            line,
        }
    }

    pub fn is_extern(&self) -> bool {
        self.linkage == Linkage::Extern
    }
}

#[derive(Debug, Default)]
pub struct Labels {
    labels: IndexMap<String, Label>,
}

impl Labels {
    pub fn new() -> Self {
        Labels {
            labels: IndexMap::new(),
        }
    }

    /// The first definition wins; a second one is reported and dropped.
    pub fn insert(&mut self, name: &str, label: Label) -> Result<(), Error> {
        if let Some(prev) = self.labels.get(name) {
            return Err(Error::RedefinedLabel(name.to_string(), prev.line));
        }
        self.labels.insert(name.to_string(), label);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Label> {
        self.labels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Moves every data label behind the code segment.
    pub fn relocate_data(&mut self, ic: u32) {
        for label in self.labels.values_mut() {
            if label.kind == LabelKind::Data {
                label.value += ic;
            }
        }
    }
}

// ----------------------------------------------------------------------------
// References waiting for the second pass

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Direct addressing: the word receives the label's address.
    Immediate,
    /// `&label`: the word receives the distance to the label.
    Relative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub kind: RefKind,
    /// Absolute address of the operand word to patch.
    pub addr: u32,
    pub line: usize,
}

// ----------------------------------------------------------------------------
// Entries

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Default)]
pub struct Entries(Vec<Entry>);

impl Entries {
    /// Returns `false` if the name was already declared.
    pub fn push(&mut self, name: &str, line: usize) -> bool {
        if self.0.iter().any(|e| e.name == name) {
            return false;
        }
        self.0.push(Entry {
            name: name.to_string(),
            line,
        });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
