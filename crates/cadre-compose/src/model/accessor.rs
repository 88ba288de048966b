//! Accessors and the before/after advice attached to them.

use cadre_core::types::CapabilityId;
use serde::{Deserialize, Serialize};

/// Type reference used in accessor signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "of")]
pub enum TypeRef {
    Identifier,
    String,
    Integer,
    Boolean,
    /// The owning definition itself.
    SelfType,
    /// An instance of the named definition.
    Definition(String),
    /// A value of the named helper enumeration.
    Enumeration(String),
    /// Zero or more of the inner type.
    List(Box<TypeRef>),
}

/// One typed accessor argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub type_ref: TypeRef,
}

/// Whether advice runs before or after the accessor body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvicePosition {
    Before,
    After,
}

/// Behavior attached to an accessor, possibly by a different capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub source: CapabilityId,
    pub name: String,
    pub position: AdvicePosition,
    /// Registry-wide declaration sequence number.
    pub order: u64,
}

/// A named operation a capability contributes to its definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub result: Option<TypeRef>,
    pub unique_result: bool,
    pub mutating: bool,
    /// Set by the registry when the accessor is declared.
    pub owner: Option<CapabilityId>,
    pub advice: Vec<Advice>,
}

impl Accessor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            result: None,
            unique_result: false,
            mutating: false,
            owner: None,
            advice: Vec::new(),
        }
    }

    pub fn argument(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            type_ref,
        });
        self
    }

    pub fn returns(mut self, type_ref: TypeRef) -> Self {
        self.result = Some(type_ref);
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique_result = unique;
        self
    }

    pub fn mutating(mut self) -> Self {
        self.mutating = true;
        self
    }

    /// Advice of one position in declaration order.
    pub fn chain(&self, position: AdvicePosition) -> Vec<&Advice> {
        let mut chain: Vec<&Advice> = self
            .advice
            .iter()
            .filter(|a| a.position == position)
            .collect();
        chain.sort_by_key(|a| a.order);
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advice(name: &str, position: AdvicePosition, order: u64) -> Advice {
        Advice {
            source: CapabilityId(0),
            name: name.to_string(),
            position,
            order,
        }
    }

    #[test]
    fn chain_follows_declaration_order_not_insertion_order() {
        let mut accessor = Accessor::new("create");
        accessor.advice.push(advice("b2", AdvicePosition::Before, 7));
        accessor.advice.push(advice("a1", AdvicePosition::After, 3));
        accessor.advice.push(advice("b1", AdvicePosition::Before, 2));

        let before: Vec<&str> = accessor
            .chain(AdvicePosition::Before)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(before, vec!["b1", "b2"]);
        assert_eq!(accessor.chain(AdvicePosition::After).len(), 1);
    }
}
