use playtomic::{copyable, Nullable};

#[copyable]
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ViewState {
    id: i32,
    name: Option<String>,
}

#[copyable]
#[derive(Clone, Debug, PartialEq)]
struct Pair<T: Clone>(T, u8);

#[copyable]
#[derive(Clone, Debug, PartialEq)]
struct Wrapper<T> {
    value: T,
}

#[derive(Debug, PartialEq)]
struct NotClone(u8);

#[copyable]
#[derive(Debug)]
struct Shared<T> {
    value: std::rc::Rc<T>,
}

fn state() -> ViewState {
    ViewState { id: 1, name: Some("Ada".to_owned()) }
}

#[test]
fn unset_arguments_keep_current_values() {
    assert_eq!(state().copy(None, Nullable::Unset), state());
}

#[test]
fn explicit_arguments_replace_values() {
    assert_eq!(
        state().copy(Some(2), Nullable::Value("Grace".to_owned())),
        ViewState { id: 2, name: Some("Grace".to_owned()) }
    );
}

#[test]
fn optional_fields_can_be_cleared() {
    assert_eq!(state().copy(None, Nullable::Null), ViewState { id: 1, name: None });
    let cleared: Nullable<String> = None.into();
    assert_eq!(state().copy(None, cleared), ViewState { id: 1, name: None });
}

#[test]
fn tuple_structs_and_generics() {
    let pair = Pair("left", 1);
    assert_eq!(pair.copy(None, Some(2)), Pair("left", 2));
    assert_eq!(pair.copy(Some("right"), None), Pair("right", 1));
}

#[test]
fn unbounded_generics_need_clone_only_to_copy() {
    let wrapper = Wrapper { value: 1_u8 };
    assert_eq!(wrapper.copy(None), Wrapper { value: 1 });
    assert_eq!(wrapper.copy(Some(5)), Wrapper { value: 5 });

    let shared = Shared { value: std::rc::Rc::new(NotClone(1)) };
    let copied = shared.copy(None);
    assert!(std::rc::Rc::ptr_eq(&copied.value, &shared.value));
    assert_eq!(*copied.value, NotClone(1));
}

#[test]
fn nullable_defaults_to_unset() {
    let unset: Nullable<u8> = Nullable::default();
    assert!(unset.is_unset());
    assert_eq!(unset.or(Some(3)), Some(3));
    assert_eq!(Nullable::Value(4).or(Some(3)), Some(4));
    assert_eq!(Nullable::<u8>::Null.or(Some(3)), None);
}
