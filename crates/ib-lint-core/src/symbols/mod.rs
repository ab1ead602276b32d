//! Source symbol table: classes and their Interface Builder connections.
//!
//! The table is built once per run by [`SymbolTableBuilder`] and is then
//! only handed out by shared reference, so rules can read it but never
//! change it.

mod builder;
mod record;

pub use builder::{extract_classes, BuildReport, SymbolTableBuilder};
pub use record::{
    DeclarationKind, DeclarationRecord, DecodeError, MemberAttribute, MemberRecord, SourceDecoder,
};

use crate::position::Position;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// A member of a class that Interface Builder can connect to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Connection {
    /// `@IBOutlet var label: UILabel!`
    Outlet {
        /// Property name.
        property_name: String,
        /// Whether the declared type ends in `?`.
        is_optional: bool,
        /// Where the property name is declared.
        position: Position,
    },
    /// `@IBAction func tap(_ sender: Any)`
    Action {
        /// Objective-C selector of the method.
        selector_name: String,
        /// Where the method name is declared.
        position: Position,
    },
}

impl Connection {
    /// Declared position of this connection.
    #[must_use]
    pub fn position(&self) -> &Position {
        match self {
            Self::Outlet { position, .. } | Self::Action { position, .. } => position,
        }
    }
}

/// A class or extension found in the project sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSymbol {
    /// Class (or extended type) name.
    pub name: String,
    /// Source file declaring it.
    pub file: PathBuf,
    /// Inherited types as written in the declaration.
    pub inherited_types: Vec<String>,
    /// Outlets and actions in declaration order.
    pub connections: Vec<Connection>,
    /// Position of the declared name.
    pub position: Position,
}

impl ClassSymbol {
    /// The first inherited type, which Swift requires to be the superclass
    /// when there is one.
    #[must_use]
    pub fn superclass(&self) -> Option<&str> {
        self.inherited_types.first().map(String::as_str)
    }

    /// Iterates over declared outlets.
    pub fn outlets(&self) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(|c| matches!(c, Connection::Outlet { .. }))
    }

    /// Iterates over declared actions.
    pub fn actions(&self) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(|c| matches!(c, Connection::Action { .. }))
    }

    /// Finds the outlet declared for `property`.
    #[must_use]
    pub fn outlet(&self, property: &str) -> Option<&Connection> {
        self.outlets().find(|c| {
            matches!(c, Connection::Outlet { property_name, .. } if property_name == property)
        })
    }

    /// Finds the action declared for `selector`.
    #[must_use]
    pub fn action(&self, selector: &str) -> Option<&Connection> {
        self.actions().find(|c| {
            matches!(c, Connection::Action { selector_name, .. } if selector_name == selector)
        })
    }
}

/// A class and its indexed ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage<'a> {
    /// The class itself followed by each indexed superclass.
    pub classes: Vec<&'a ClassSymbol>,
    /// First ancestor that is not indexed, usually a framework class.
    pub base: Option<&'a str>,
}

impl<'a> Lineage<'a> {
    /// Finds `property` on any class of the lineage.
    #[must_use]
    pub fn outlet(&self, property: &str) -> Option<&'a Connection> {
        self.classes.iter().find_map(|&c| c.outlet(property))
    }

    /// Finds `selector` on any class of the lineage.
    #[must_use]
    pub fn action(&self, selector: &str) -> Option<&'a Connection> {
        self.classes.iter().find_map(|&c| c.action(selector))
    }
}

/// Run-scoped mapping from class name to [`ClassSymbol`].
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    classes: HashMap<String, ClassSymbol>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `symbol`, replacing any earlier symbol of the same name.
    ///
    /// Last write wins. An extension declared in one file and the class in
    /// another therefore collapse into whichever was processed last; the
    /// builder processes files in a stable order so the winner is
    /// reproducible. Returns the replaced symbol.
    pub fn insert_or_replace(&mut self, symbol: ClassSymbol) -> Option<ClassSymbol> {
        let replaced = self.classes.insert(symbol.name.clone(), symbol);
        if let Some(old) = &replaced {
            debug!(
                "Replacing symbol {} from {} with later declaration",
                old.name,
                old.file.display()
            );
        }
        replaced
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassSymbol> {
        self.classes.get(name)
    }

    /// Returns true if a class of that name is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Walks the superclass chain of `name` through the table.
    ///
    /// Stops at the first superclass that is not indexed and reports it as
    /// the lineage base. A cycle ends the walk without a base.
    #[must_use]
    pub fn lineage(&self, name: &str) -> Lineage<'_> {
        let mut classes: Vec<&ClassSymbol> = Vec::new();
        let mut next = self.get(name);
        let mut base = None;

        while let Some(symbol) = next {
            if classes.iter().any(|c| c.name == symbol.name) {
                break;
            }
            classes.push(symbol);
            next = match symbol.superclass() {
                Some(parent) => match self.get(parent) {
                    Some(found) => Some(found),
                    None => {
                        base = Some(parent);
                        None
                    }
                },
                None => None,
            };
        }

        Lineage { classes, base }
    }

    /// Number of classes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if the table holds no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates over all symbols sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &ClassSymbol> {
        let mut symbols: Vec<&ClassSymbol> = self.classes.values().collect();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        symbols.into_iter()
    }
}

impl FromIterator<ClassSymbol> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = ClassSymbol>>(iter: I) -> Self {
        let mut table = Self::new();
        for symbol in iter {
            table.insert_or_replace(symbol);
        }
        table
    }
}
