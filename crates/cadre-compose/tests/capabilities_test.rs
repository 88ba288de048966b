//! Tests for the built-in capability vocabulary.

use cadre_compose::capabilities::{
    GenericLink, HasIdentity, Lifecycle, LinkObject, LinkSide, LinkedToParent, Named, Versioned,
    Workflow,
};
use cadre_compose::model::{LinkMultiplicity, NamingMode};
use cadre_compose::resolve::HelperKind;
use cadre_compose::{
    CapabilityBehavior, CapabilityKind, CapabilityMode, CapabilitySpec, FieldType, PhaseContext,
    Registry, Resolver, Rule, TypeRef,
};
use cadre_core::config::ResolutionConfig;
use cadre_core::errors::{CadreErrorCode, ComposeError, ComposeResult, ResolutionError, RuleError};

fn identified(registry: &mut Registry, name: &str) -> cadre_core::types::DefinitionId {
    let id = registry.add_definition(name, "app").unwrap();
    registry.attach(id, CapabilitySpec::new(HasIdentity)).unwrap();
    id
}

#[test]
fn identity_contributes_key_and_crud_accessors() {
    let mut registry = Registry::new();
    identified(&mut registry, "Customer");
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let customer = model.definition("Customer").unwrap();
    let id = customer.field("id").unwrap();
    assert_eq!(id.field_type, FieldType::Identifier);
    assert!(id.indexed);

    let names: Vec<&str> = customer.accessors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["get_id", "find_by_id", "create", "update", "delete"]);
    assert!(customer.accessor("find_by_id").unwrap().unique_result);
    for mutating in ["create", "update", "delete"] {
        assert!(customer.accessor(mutating).unwrap().mutating, "{mutating}");
    }
    assert_eq!(customer.accessor("get_id").unwrap().owner, "HasIdentity");
}

#[test]
fn explicit_naming_adds_setter() {
    let mut registry = Registry::new();
    let customer = identified(&mut registry, "Customer");
    registry.attach(customer, CapabilitySpec::new(Named)).unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let customer = model.definition("Customer").unwrap();
    let named = customer.capability(CapabilityKind::Named).unwrap();
    assert_eq!(
        named.mode,
        CapabilityMode::Naming {
            naming: NamingMode::Explicit,
            unique: false,
        }
    );
    assert!(customer.accessor("set_name").is_some());
    let find = customer.accessor("find_by_name").unwrap();
    assert!(!find.unique_result);
    assert_eq!(find.result, Some(TypeRef::List(Box::new(TypeRef::SelfType))));
    assert!(customer.accessor("create").unwrap().before.is_empty());
    assert!(named.helpers.is_empty());
}

#[test]
fn auto_naming_computes_name_before_create() {
    let mut registry = Registry::new();
    let invoice = identified(&mut registry, "Invoice");
    registry
        .attach(
            invoice,
            CapabilitySpec::new(Named)
                .rule(Rule::auto_naming("INV-{seq}"))
                .rule(Rule::unique_name()),
        )
        .unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let invoice = model.definition("Invoice").unwrap();
    assert!(invoice.accessor("set_name").is_none());
    assert!(invoice.accessor("find_by_name").unwrap().unique_result);

    let create = invoice.accessor("create").unwrap();
    assert_eq!(create.before_names(), vec!["compute_name"]);
    assert_eq!(create.before[0].source_capability, "Named");
    assert_eq!(create.before[0].source_definition, "Invoice");

    let helper = model.helper("InvoiceNamePattern").unwrap();
    assert_eq!(
        helper.kind,
        HelperKind::NamePattern {
            pattern: "INV-{seq}".into()
        }
    );
    assert_eq!(
        invoice.capability(CapabilityKind::Named).unwrap().helpers,
        vec!["InvoiceNamePattern".to_string()]
    );
}

#[test]
fn auto_naming_pattern_must_reference_known_fields() {
    let build = || {
        let mut registry = Registry::new();
        let invoice = identified(&mut registry, "Invoice");
        registry
            .attach(
                invoice,
                CapabilitySpec::new(Named).rule(Rule::auto_naming("INV-{year}-{seq}")),
            )
            .unwrap();
        registry
    };

    let err = Resolver::default().resolve(&mut build()).unwrap_err();
    match err {
        ComposeError::Rule(RuleError::RuleValidationFailure {
            rule,
            capability,
            message,
            ..
        }) => {
            assert_eq!(rule, "AutoNaming");
            assert_eq!(capability, "Named");
            assert!(message.contains("year"), "{message}");
        }
        other => panic!("expected RuleValidationFailure, got {other:?}"),
    }

    let lenient = Resolver::new(ResolutionConfig {
        check_rules: Some(false),
        ..Default::default()
    });
    assert!(lenient.resolve(&mut build()).is_ok());
}

#[test]
fn auto_naming_pattern_may_reference_any_field_of_the_definition() {
    let mut registry = Registry::new();
    let order = identified(&mut registry, "Order");
    registry
        .attach(order, CapabilitySpec::new(Versioned))
        .unwrap();
    registry
        .attach(
            order,
            CapabilitySpec::new(Named).rule(Rule::auto_naming("ORD-{id}-v{version}")),
        )
        .unwrap();
    assert!(Resolver::default().resolve(&mut registry).is_ok());
}

#[test]
fn conflicting_auto_naming_patterns_are_rejected() {
    let mut registry = Registry::new();
    let invoice = identified(&mut registry, "Invoice");
    registry
        .attach(
            invoice,
            CapabilitySpec::new(Named)
                .rule(Rule::auto_naming("INV-{seq}"))
                .rule(Rule::auto_naming("BILL-{id}")),
        )
        .unwrap();

    let err = Resolver::default().resolve(&mut registry).unwrap_err();
    assert_eq!(err.error_code(), "RULE_VALIDATION_FAILURE");
    assert!(matches!(
        err,
        ComposeError::Rule(RuleError::RuleValidationFailure { ref capability, ref message, .. })
            if capability == "Named" && message.contains("2 auto-naming rules")
    ));
}

#[test]
fn versioning_bumps_after_update() {
    let mut registry = Registry::new();
    let order = identified(&mut registry, "Order");
    registry.attach(order, CapabilitySpec::new(Versioned)).unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let order = model.definition("Order").unwrap();
    assert_eq!(order.field("version").unwrap().field_type, FieldType::Integer);
    assert_eq!(order.accessor("update").unwrap().after_names(), vec!["bump_version"]);
    assert!(order.accessor("update").unwrap().before.is_empty());
}

#[test]
fn lifecycle_declares_state_enumeration() {
    let mut registry = Registry::new();
    let order = identified(&mut registry, "Order");
    registry
        .attach(
            order,
            CapabilitySpec::new(Lifecycle::new(["draft", "placed", "shipped"]).initial("draft"))
                .rule(Rule::transition_guard("draft", "placed")),
        )
        .unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let order = model.definition("Order").unwrap();
    assert_eq!(
        order.field("state").unwrap().field_type,
        FieldType::Enumeration {
            name: "OrderState".into()
        }
    );
    assert!(order.accessor("transition").unwrap().mutating);
    assert_eq!(
        order.accessor("create").unwrap().before_names(),
        vec!["enter_initial_state"]
    );
    assert_eq!(
        model.helper("OrderState").unwrap().kind,
        HelperKind::StateEnumeration {
            states: vec!["draft".into(), "placed".into(), "shipped".into()]
        }
    );
}

#[test]
fn transition_guard_must_name_declared_states() {
    let mut registry = Registry::new();
    let order = identified(&mut registry, "Order");
    registry
        .attach(
            order,
            CapabilitySpec::new(Lifecycle::new(["draft", "placed"]))
                .rule(Rule::transition_guard("placed", "archived")),
        )
        .unwrap();

    let err = Resolver::default().resolve(&mut registry).unwrap_err();
    assert_eq!(err.error_code(), "RULE_VALIDATION_FAILURE");
    assert!(err.to_string().contains("archived"));
}

#[test]
fn workflow_reads_lifecycle_and_binds_assignee() {
    let mut registry = Registry::new();
    let user = identified(&mut registry, "User");
    let task = identified(&mut registry, "Task");
    registry
        .attach(task, CapabilitySpec::new(Lifecycle::new(["open", "done"])))
        .unwrap();
    registry
        .attach(task, CapabilitySpec::new(Workflow::new(user)))
        .unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let task = model.definition("Task").unwrap();
    assert_eq!(
        task.accessor("advance").unwrap().result,
        Some(TypeRef::Enumeration("TaskState".into()))
    );
    assert_eq!(task.accessor("transition").unwrap().after_names(), vec!["notify_assignee"]);
    assert_eq!(task.bindings.len(), 1);
    assert_eq!(task.bindings[0].target, "User");
    assert_eq!(task.bindings[0].satisfied_by, "HasIdentity");
    assert_eq!(model.stats.deferred_bindings, 0);
}

#[test]
fn workflow_without_lifecycle_is_missing_dependency() {
    let mut registry = Registry::new();
    let user = identified(&mut registry, "User");
    let task = identified(&mut registry, "Task");
    registry
        .attach(task, CapabilitySpec::new(Workflow::new(user)))
        .unwrap();

    let err = Resolver::default().resolve(&mut registry).unwrap_err();
    assert!(matches!(
        err,
        ComposeError::Resolution(ResolutionError::MissingDependency { ref capability, ref dependency, .. })
            if capability == "Workflow" && dependency == "Lifecycle"
    ));
}

#[test]
fn binding_to_definition_without_identity_is_unresolved() {
    let mut registry = Registry::new();
    let team = registry.add_definition("Team", "org").unwrap();
    let task = identified(&mut registry, "Task");
    registry
        .attach(task, CapabilitySpec::new(Lifecycle::new(["open"])))
        .unwrap();
    registry
        .attach(task, CapabilitySpec::new(Workflow::new(team)))
        .unwrap();

    let err = Resolver::default().resolve(&mut registry).unwrap_err();
    match err {
        ComposeError::Resolution(ResolutionError::UnresolvedBinding {
            definition,
            capability,
            target,
            shape,
        }) => {
            assert_eq!(definition, "Task");
            assert_eq!(capability, "Workflow");
            assert_eq!(target, "Team");
            assert_eq!(shape, "HasIdentity");
        }
        other => panic!("expected UnresolvedBinding, got {other:?}"),
    }
}

/// Gives its definition an identity only once finalizing.
#[derive(Debug)]
struct LateIdentity;

impl CapabilityBehavior for LateIdentity {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Versioned
    }

    fn finalize(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let here = cx.definition_id();
        cx.inject(here, CapabilitySpec::new(HasIdentity))?;
        Ok(())
    }
}

#[test]
fn deferred_binding_is_settled_at_freeze() {
    let mut registry = Registry::new();
    let team = registry.add_definition("Team", "org").unwrap();
    registry
        .attach(team, CapabilitySpec::new(LateIdentity).instance("late"))
        .unwrap();
    let task = identified(&mut registry, "Task");
    registry
        .attach(task, CapabilitySpec::new(Lifecycle::new(["open"])))
        .unwrap();
    registry
        .attach(task, CapabilitySpec::new(Workflow::new(team)))
        .unwrap();

    let model = Resolver::default().resolve(&mut registry).unwrap();
    assert_eq!(model.stats.deferred_bindings, 1);

    let team = model.definition("Team").unwrap();
    let labels: Vec<&str> = team.capabilities.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Versioned[late]", "HasIdentity"]);

    let task = model.definition("Task").unwrap();
    assert_eq!(task.bindings.len(), 1);
    assert_eq!(task.bindings[0].capability, "Workflow");
    assert_eq!(task.bindings[0].target, "Team");
    assert_eq!(task.bindings[0].satisfied_by, "HasIdentity");
}

#[test]
fn parent_link_adds_child_listing_and_cascade() {
    let mut registry = Registry::new();
    let invoice = identified(&mut registry, "Invoice");
    let line_item = identified(&mut registry, "LineItem");
    registry
        .attach(line_item, CapabilitySpec::new(LinkedToParent::new(invoice)))
        .unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let child = model.definition("LineItem").unwrap();
    assert_eq!(
        child.field("parent_id").unwrap().field_type,
        FieldType::Reference {
            definition: "Invoice".into()
        }
    );
    assert_eq!(
        child.accessor("get_parent").unwrap().result,
        Some(TypeRef::Definition("Invoice".into()))
    );

    let parent = model.definition("Invoice").unwrap();
    let listing = parent.accessor("list_line_item").unwrap();
    assert_eq!(listing.owner, "LinkedFromChildren[LineItem]");
    let delete = parent.accessor("delete").unwrap();
    assert_eq!(delete.after_names(), vec!["cascade_delete_line_item"]);
    assert_eq!(delete.after[0].source_capability, "LinkedFromChildren[LineItem]");
}

#[test]
fn link_object_injects_both_ends_with_multiplicity() {
    let mut registry = Registry::new();
    let student = identified(&mut registry, "Student");
    let course = identified(&mut registry, "Course");
    let enrollment = identified(&mut registry, "Enrollment");
    registry
        .attach(
            enrollment,
            CapabilitySpec::new(LinkObject::new(student, course))
                .rule(Rule::max_one_link_from_left()),
        )
        .unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let link = model.definition("Enrollment").unwrap();
    assert_eq!(
        link.capability(CapabilityKind::LinkObject).unwrap().mode.multiplicity(),
        Some(LinkMultiplicity::OneFromLeft)
    );
    assert!(link.field("left_id").is_some());
    assert!(link.field("right_id").is_some());
    assert!(link.accessor("find_by_left").unwrap().unique_result);
    assert!(!link.accessor("find_by_right").unwrap().unique_result);
    assert_eq!(link.bindings.len(), 2);
    assert_eq!(
        model.helper("EnrollmentTable").unwrap().kind,
        HelperKind::LinkTable {
            left: "Student".into(),
            right: "Course".into()
        }
    );

    let student = model.definition("Student").unwrap();
    let end = student
        .capability_instance(CapabilityKind::GenericLink, "Enrollment")
        .unwrap();
    assert_eq!(end.label, "GenericLink[Enrollment]");
    assert!(student.accessor("list_enrollment").unwrap().unique_result);

    let course = model.definition("Course").unwrap();
    assert!(!course.accessor("list_enrollment").unwrap().unique_result);
    assert_eq!(model.stats.injections, 2);
}

#[test]
fn self_link_gets_distinct_ends() {
    let mut registry = Registry::new();
    let person = identified(&mut registry, "Person");
    let friendship = identified(&mut registry, "Friendship");
    registry
        .attach(friendship, CapabilitySpec::new(LinkObject::new(person, person)))
        .unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let person = model.definition("Person").unwrap();
    assert_eq!(person.count_of(CapabilityKind::GenericLink), 2);
    assert!(person.accessor("list_friendship").is_some());
    assert!(person.accessor("list_friendship_inverse").is_some());
}

#[test]
fn generic_link_without_link_object_is_missing_dependency() {
    let mut registry = Registry::new();
    let order = identified(&mut registry, "Order");
    let shipment = registry.add_definition("Shipment", "sales").unwrap();
    registry
        .attach(
            order,
            CapabilitySpec::new(GenericLink::new(shipment, LinkSide::Left)),
        )
        .unwrap();

    let err = Resolver::default().resolve(&mut registry).unwrap_err();
    assert!(matches!(
        err,
        ComposeError::Resolution(ResolutionError::MissingDependency { ref dependency, .. })
            if dependency == "LinkObject"
    ));
}

#[test]
fn advice_from_several_capabilities_keeps_declaration_order() {
    let mut registry = Registry::new();
    let invoice = identified(&mut registry, "Invoice");
    registry
        .attach(
            invoice,
            CapabilitySpec::new(Named).rule(Rule::auto_naming("INV-{seq}")),
        )
        .unwrap();
    registry
        .attach(
            invoice,
            CapabilitySpec::new(Lifecycle::new(["open", "paid"]).initial("open")),
        )
        .unwrap();
    registry.attach(invoice, CapabilitySpec::new(Versioned)).unwrap();
    let line_item = identified(&mut registry, "LineItem");
    registry
        .attach(line_item, CapabilitySpec::new(LinkedToParent::new(invoice)))
        .unwrap();
    let model = Resolver::default().resolve(&mut registry).unwrap();

    let invoice = model.definition("Invoice").unwrap();
    // Lifecycle advises during its structural phase; naming waits for its
    // sealed mode in the finalize phase.
    assert_eq!(
        invoice.accessor("create").unwrap().before_names(),
        vec!["enter_initial_state", "compute_name"]
    );
    assert_eq!(
        invoice.accessor("update").unwrap().after_names(),
        vec!["bump_version"]
    );
    assert_eq!(
        invoice.accessor("delete").unwrap().after_names(),
        vec!["cascade_delete_line_item"]
    );

    let kinds: Vec<CapabilityKind> = invoice.capabilities.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CapabilityKind::HasIdentity,
            CapabilityKind::Named,
            CapabilityKind::Lifecycle,
            CapabilityKind::Versioned,
            CapabilityKind::LinkedFromChildren,
        ]
    );
}
