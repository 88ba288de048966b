//! The definition registry: arenas for definitions, capabilities,
//! accessors, and bindings, plus the structural invariants that guard them.

use cadre_core::errors::{ComposeResult, ModelError, RuleError};
use cadre_core::types::{AccessorId, BindingId, CapabilityId, DefinitionId, FxHashMap};

use crate::frozen::FrozenModel;
use crate::model::{
    Accessor, Advice, AdvicePosition, Binding, BindingState, Capability, CapabilityKind,
    CapabilityShape, CapabilitySpec, CapabilityState, Definition, Field, Rule,
};

#[derive(Debug)]
enum RegistryStatus {
    Open,
    Frozen(Box<FrozenModel>),
    Poisoned,
}

/// Every definition of one model and everything attached to them.
#[derive(Debug)]
pub struct Registry {
    definitions: Vec<Definition>,
    capabilities: Vec<Capability>,
    accessors: Vec<Accessor>,
    bindings: Vec<Binding>,
    names: FxHashMap<String, DefinitionId>,
    advice_seq: u64,
    status: RegistryStatus,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
            capabilities: Vec::new(),
            accessors: Vec::new(),
            bindings: Vec::new(),
            names: FxHashMap::default(),
            advice_seq: 0,
            status: RegistryStatus::Open,
        }
    }

    /// Register a definition. Registration order is resolution and emission order.
    pub fn add_definition(
        &mut self,
        name: impl Into<String>,
        module: impl Into<String>,
    ) -> ComposeResult<DefinitionId> {
        self.ensure_open("add a definition")?;
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(ModelError::DuplicateDefinition { name }.into());
        }
        let id = DefinitionId::from_index(self.definitions.len());
        self.names.insert(name.clone(), id);
        self.definitions.push(Definition::new(id, name, module.into()));
        Ok(id)
    }

    /// Attach a capability to a definition.
    pub fn attach(&mut self, definition: DefinitionId, spec: CapabilitySpec) -> ComposeResult<CapabilityId> {
        self.ensure_open("attach a capability")?;
        self.insert_capability(definition, spec)
    }

    /// Attach a rule to an already attached capability.
    pub fn attach_rule(&mut self, capability: CapabilityId, rule: Rule) -> ComposeResult<()> {
        self.ensure_open("attach a rule")?;
        self.push_rule(capability, rule)
    }

    /// # Panics
    /// When `id` was not issued by this registry; see [`Registry::get_definition`].
    pub fn definition(&self, id: DefinitionId) -> &Definition {
        &self.definitions[id.index()]
    }

    pub fn get_definition(&self, id: DefinitionId) -> Option<&Definition> {
        self.definitions.get(id.index())
    }

    /// Like [`Registry::get_definition`], but an id this registry never
    /// issued is an error naming `referrer`.
    pub fn checked_definition(
        &self,
        id: DefinitionId,
        referrer: impl FnOnce() -> String,
    ) -> ComposeResult<&Definition> {
        self.get_definition(id).ok_or_else(|| {
            ModelError::UnknownDefinitionId {
                id: id.0,
                referrer: referrer(),
            }
            .into()
        })
    }

    pub fn definition_by_name(&self, name: &str) -> Option<DefinitionId> {
        self.names.get(name).copied()
    }

    /// Like [`Registry::definition_by_name`], but absence is an error.
    pub fn require_definition(&self, name: &str) -> ComposeResult<DefinitionId> {
        self.definition_by_name(name).ok_or_else(|| {
            ModelError::UnknownDefinition {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn capability(&self, id: CapabilityId) -> &Capability {
        &self.capabilities[id.index()]
    }

    pub fn capability_count(&self) -> usize {
        self.capabilities.len()
    }

    /// Capabilities of one definition in insertion order.
    pub fn capabilities_of(&self, definition: DefinitionId) -> impl Iterator<Item = &Capability> {
        self.definition(definition)
            .capabilities()
            .iter()
            .map(move |id| self.capability(*id))
    }

    pub fn accessor(&self, id: AccessorId) -> &Accessor {
        &self.accessors[id.index()]
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Accessor named `name` on `definition`, whichever capability owns it.
    pub fn find_accessor(&self, definition: DefinitionId, name: &str) -> Option<AccessorId> {
        self.capabilities_of(definition)
            .flat_map(|cap| cap.accessors.iter().copied())
            .find(|id| self.accessor(*id).name == name)
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.status, RegistryStatus::Frozen(_))
    }

    pub fn is_poisoned(&self) -> bool {
        matches!(self.status, RegistryStatus::Poisoned)
    }

    /// The model produced by the run that froze this registry.
    pub fn frozen_model(&self) -> Option<&FrozenModel> {
        match &self.status {
            RegistryStatus::Frozen(model) => Some(model),
            _ => None,
        }
    }

    pub(crate) fn definition_name(&self, id: DefinitionId) -> &str {
        &self.definitions[id.index()].name
    }

    pub(crate) fn capability_label(&self, id: CapabilityId) -> String {
        self.capability(id).label()
    }

    pub(crate) fn capability_mut(&mut self, id: CapabilityId) -> &mut Capability {
        &mut self.capabilities[id.index()]
    }

    pub(crate) fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.index()]
    }

    pub(crate) fn freeze(&mut self, model: FrozenModel) {
        self.status = RegistryStatus::Frozen(Box::new(model));
    }

    pub(crate) fn poison(&mut self) {
        self.status = RegistryStatus::Poisoned;
    }

    fn ensure_open(&self, operation: &str) -> ComposeResult<()> {
        match self.status {
            RegistryStatus::Open => Ok(()),
            RegistryStatus::Frozen(_) => Err(ModelError::RegistryFrozen {
                operation: operation.to_string(),
            }
            .into()),
            RegistryStatus::Poisoned => Err(ModelError::RegistryPoisoned.into()),
        }
    }

    /// Append a capability to `definition` without scheduling it.
    pub(crate) fn insert_capability(
        &mut self,
        definition: DefinitionId,
        spec: CapabilitySpec,
    ) -> ComposeResult<CapabilityId> {
        let label = spec.label();
        let definition_name = self
            .checked_definition(definition, || label.clone())?
            .name
            .clone();

        let referrer = || format!("{label} on {definition_name}");
        for id in spec.declared_owner.into_iter().chain(spec.behavior.targets()) {
            self.checked_definition(id, referrer)?;
        }

        if let Some(declared) = spec.declared_owner {
            if declared != definition {
                return Err(ModelError::InconsistentOwnership {
                    definition: definition_name,
                    capability: label,
                    declared_owner: self.definition_name(declared).to_string(),
                }
                .into());
            }
        }

        for rule in &spec.rules {
            check_rule_target(rule, spec.kind, &definition_name, &label)?;
        }

        let id = CapabilityId::from_index(self.capabilities.len());
        let kind = spec.kind;
        let instance = spec.instance.clone();
        if !self.definitions[definition.index()].push(kind, &instance, id) {
            return Err(ModelError::DuplicateCapability {
                definition: definition_name,
                kind: kind.as_str().to_string(),
                instance,
            }
            .into());
        }
        self.capabilities
            .push(Capability::from_spec(id, definition, spec));
        Ok(id)
    }

    pub(crate) fn push_rule(&mut self, capability: CapabilityId, rule: Rule) -> ComposeResult<()> {
        let cap = self.capability(capability);
        let definition = self.definition_name(cap.owner).to_string();
        let label = cap.label();
        check_rule_target(&rule, cap.kind, &definition, &label)?;
        if cap.state != CapabilityState::Pending {
            return Err(RuleError::RuleSetSealed {
                rule: rule.name,
                definition,
                capability: label,
            }
            .into());
        }
        self.capability_mut(capability).rules.push(rule);
        Ok(())
    }

    pub(crate) fn push_field(&mut self, capability: CapabilityId, field: Field) -> ComposeResult<()> {
        let owner = self.capability(capability).owner;
        let taken = self
            .capabilities_of(owner)
            .any(|cap| cap.fields.iter().any(|f| f.name == field.name));
        if taken {
            return Err(ModelError::DuplicateField {
                definition: self.definition_name(owner).to_string(),
                capability: self.capability_label(capability),
                field: field.name,
            }
            .into());
        }
        self.capability_mut(capability).fields.push(field);
        Ok(())
    }

    pub(crate) fn push_accessor(
        &mut self,
        capability: CapabilityId,
        mut accessor: Accessor,
    ) -> ComposeResult<AccessorId> {
        let owner = self.capability(capability).owner;
        if self.find_accessor(owner, &accessor.name).is_some() {
            return Err(ModelError::DuplicateAccessor {
                definition: self.definition_name(owner).to_string(),
                capability: self.capability_label(capability),
                accessor: accessor.name,
            }
            .into());
        }
        let id = AccessorId::from_index(self.accessors.len());
        accessor.owner = Some(capability);
        self.accessors.push(accessor);
        self.capability_mut(capability).accessors.push(id);
        Ok(id)
    }

    pub(crate) fn push_advice(
        &mut self,
        target: AccessorId,
        source: CapabilityId,
        name: String,
        position: AdvicePosition,
    ) {
        let order = self.advice_seq;
        self.advice_seq += 1;
        self.accessors[target.index()].advice.push(Advice {
            source,
            name,
            position,
            order,
        });
    }

    pub(crate) fn push_binding(
        &mut self,
        source: CapabilityId,
        target: DefinitionId,
        shape: CapabilityShape,
    ) -> (BindingId, BindingState) {
        let state = match shape.find_in(self.definition(target)) {
            Some(found) => BindingState::Bound(found),
            None => BindingState::Deferred,
        };
        let id = BindingId::from_index(self.bindings.len());
        self.bindings.push(Binding {
            source,
            target,
            shape,
            state,
        });
        self.capability_mut(source).bindings.push(id);
        (id, state)
    }
}

/// A rule may only decorate the capability kind it declares.
fn check_rule_target(
    rule: &Rule,
    kind: CapabilityKind,
    definition: &str,
    capability: &str,
) -> Result<(), RuleError> {
    let expected = rule.decorates();
    if expected == kind {
        return Ok(());
    }
    Err(RuleError::RuleTypeMismatch {
        rule: rule.name.clone(),
        expected: expected.as_str().to_string(),
        definition: definition.to_string(),
        capability: capability.to_string(),
    })
}
