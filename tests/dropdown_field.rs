use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use selectui::{
    DropdownConfig, DropdownField, LookupError, OptionLookup, SelectOption, StaticCatalog,
    Validatable, ValidationError, ValueBinding,
};

fn catalog() -> Arc<StaticCatalog> {
    Arc::new(
        StaticCatalog::new()
            .with_entry(
                "g1",
                vec![SelectOption::new("a", "A"), SelectOption::new("b", "B")],
            )
            .with_entry("empty", Vec::new()),
    )
}

fn drain_options(field: &mut DropdownField) {
    for _ in 0..500 {
        field.poll_options();
        if !field.options_pending() {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("option fetch did not settle");
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn required_field_without_value_fails_validation() {
    let mut field = DropdownField::new(
        DropdownConfig::new().with_lookup_key("g1").with_required(true),
        catalog(),
    );
    field.init();
    assert_eq!(field.validate(), Some(ValidationError::Required));
    field.write_value(Some(String::new()));
    assert_eq!(field.validate(), Some(ValidationError::Required));
    field.write_value(Some("a".to_string()));
    assert_eq!(field.validate(), None);
}

#[test]
fn optional_field_always_validates() {
    let mut field = DropdownField::new(
        DropdownConfig::new().with_lookup_key("g1").with_required(false),
        catalog(),
    );
    field.init();
    assert_eq!(field.validate(), None);
    field.write_value(Some(String::new()));
    assert_eq!(field.validate(), None);
    field.write_value(Some("whatever".to_string()));
    assert_eq!(field.validate(), None);
}

#[test]
fn written_values_read_back_unchanged() {
    let mut field = DropdownField::new(DropdownConfig::new(), catalog());
    field.init();
    field.write_value(Some("opt-2".to_string()));
    assert_eq!(field.value(), Some("opt-2"));
    field.write_value(None);
    assert_eq!(field.value(), None);
    assert!(field.is_pristine());
}

#[test]
fn fetched_options_match_the_lookup_sequence() {
    let mut field = DropdownField::new(DropdownConfig::new().with_lookup_key("g1"), catalog());
    field.init();
    drain_options(&mut field);
    assert_eq!(
        field.options(),
        &[SelectOption::new("a", "A"), SelectOption::new("b", "B")]
    );
}

#[test]
fn empty_lookup_renders_no_options_and_required_stays_invalid() {
    let mut field = DropdownField::new(
        DropdownConfig::new()
            .with_lookup_key("empty")
            .with_required(true),
        catalog(),
    );
    field.init();
    drain_options(&mut field);
    assert!(field.options().is_empty());
    assert_eq!(field.validate(), Some(ValidationError::Required));
}

#[test]
fn unknown_lookup_key_is_silently_empty() {
    let mut field = DropdownField::new(
        DropdownConfig::new().with_lookup_key("nope").with_required(true),
        catalog(),
    );
    field.init();
    drain_options(&mut field);
    assert!(field.options().is_empty());
    assert_eq!(field.validate(), Some(ValidationError::Required));
}

#[test]
fn failed_lookup_renders_like_an_empty_one() {
    struct Failing;
    impl OptionLookup for Failing {
        fn fetch(&self, _key: &str) -> Result<Vec<SelectOption>, LookupError> {
            Err(LookupError::new("backend offline"))
        }
    }
    let mut field = DropdownField::new(
        DropdownConfig::new().with_lookup_key("g1"),
        Arc::new(Failing),
    );
    field.init();
    drain_options(&mut field);
    assert!(field.options().is_empty());
    assert_eq!(field.validate(), None);
}

#[test]
fn lookup_key_wins_over_static_options() {
    let mut field = DropdownField::new(
        DropdownConfig::new()
            .with_lookup_key("g1")
            .with_static_options(vec![SelectOption::new("static", "Static")]),
        catalog(),
    );
    field.init();
    drain_options(&mut field);
    assert_eq!(
        field.options(),
        &[SelectOption::new("a", "A"), SelectOption::new("b", "B")]
    );
}

#[test]
fn static_options_are_used_when_no_key_is_configured() {
    let mut field = DropdownField::new(
        DropdownConfig::new().with_static_options(vec![SelectOption::new("static", "Static")]),
        catalog(),
    );
    field.init();
    assert!(!field.options_pending());
    assert_eq!(field.options(), &[SelectOption::new("static", "Static")]);
}

#[test]
fn inbound_writes_stay_silent_but_user_selection_notifies() {
    let mut field = DropdownField::new(DropdownConfig::new().with_lookup_key("g1"), catalog());
    let changes: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let seen = changes.clone();
    field.register_on_change(Box::new(move |value| {
        seen.borrow_mut().push(value.map(str::to_string));
    }));

    field.init();
    drain_options(&mut field);

    field.write_value(Some("a".to_string()));
    assert!(changes.borrow().is_empty());

    assert!(field.handle_key(&key(KeyCode::Down)));
    assert_eq!(*changes.borrow(), vec![Some("b".to_string())]);

    assert!(field.handle_key(&key(KeyCode::Backspace)));
    assert_eq!(
        *changes.borrow(),
        vec![Some("b".to_string()), None]
    );
}

#[test]
fn touched_fires_once_on_first_interaction() {
    let mut field = DropdownField::new(DropdownConfig::new().with_lookup_key("g1"), catalog());
    let touches = Rc::new(RefCell::new(0usize));
    let seen = touches.clone();
    field.register_on_touched(Box::new(move || {
        *seen.borrow_mut() += 1;
    }));

    field.init();
    drain_options(&mut field);

    field.write_value(Some("a".to_string()));
    assert_eq!(*touches.borrow(), 0);

    field.handle_key(&key(KeyCode::Down));
    field.handle_key(&key(KeyCode::Down));
    assert_eq!(*touches.borrow(), 1);
    assert!(field.is_touched());
}

#[test]
fn disabled_fields_ignore_keys_until_reenabled() {
    let mut field = DropdownField::new(
        DropdownConfig::new().with_lookup_key("g1").with_disabled(true),
        catalog(),
    );
    field.init();
    drain_options(&mut field);

    assert!(field.is_disabled());
    assert!(!field.handle_key(&key(KeyCode::Down)));
    assert!(field.is_pristine());

    field.set_disabled(false);
    assert!(field.handle_key(&key(KeyCode::Down)));
    assert_eq!(field.value(), Some("a"));
}

#[test]
fn disabling_is_mirrored_into_the_sub_form() {
    let mut field = DropdownField::new(
        DropdownConfig::new().with_lookup_key("g1").with_required(true),
        catalog(),
    );
    field.init();
    assert!(!field.control_valid());

    field.set_disabled(true);
    assert!(field.control_valid());

    field.set_disabled(false);
    assert!(!field.control_valid());

    field.write_value(Some("a".to_string()));
    assert!(field.control_valid());
}

#[test]
fn dispose_cancels_the_pending_fetch() {
    struct Slow;
    impl OptionLookup for Slow {
        fn fetch(&self, _key: &str) -> Result<Vec<SelectOption>, LookupError> {
            thread::sleep(Duration::from_millis(50));
            Ok(vec![SelectOption::new("late", "Late")])
        }
    }
    let mut field =
        DropdownField::new(DropdownConfig::new().with_lookup_key("g1"), Arc::new(Slow));
    field.init();
    assert!(field.options_pending());
    field.dispose();
    assert!(!field.options_pending());
    // a late worker result is discarded, never applied
    thread::sleep(Duration::from_millis(80));
    assert!(!field.poll_options());
    assert!(field.options().is_empty());
}

#[test]
fn value_written_before_options_arrive_resolves_once_they_do() {
    let mut field = DropdownField::new(DropdownConfig::new().with_lookup_key("g1"), catalog());
    field.init();
    field.write_value(Some("b".to_string()));
    assert_eq!(field.value(), Some("b"));
    assert_eq!(field.selected_label(), None);

    drain_options(&mut field);
    assert_eq!(field.selected_index(), Some(1));
    assert_eq!(field.selected_label(), Some("B"));
}

#[test]
fn reinitialization_is_a_no_op() {
    let mut field = DropdownField::new(DropdownConfig::new().with_lookup_key("g1"), catalog());
    field.init();
    drain_options(&mut field);
    field.handle_key(&key(KeyCode::Down));
    field.init();
    assert!(!field.options_pending());
    assert_eq!(field.value(), Some("a"));
}
