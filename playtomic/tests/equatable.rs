use playtomic::equatable;

#[equatable]
#[derive(Debug)]
struct Point {
    x: i32,
    y: i32,
}

#[equatable]
#[derive(Debug, Clone, Copy)]
enum Mode {
    Light,
    Dark,
}

// Already derived: nothing is added, so there is no conflicting implementation.
#[equatable]
#[derive(Debug, PartialEq)]
struct Celsius(f32);

#[test]
fn structs_compare_field_by_field() {
    assert_eq!(Point { x: 1, y: 2 }, Point { x: 1, y: 2 });
    assert_ne!(Point { x: 1, y: 2 }, Point { x: 2, y: 1 });
}

#[test]
fn enums_compare_by_variant() {
    assert_eq!(Mode::Dark, Mode::Dark);
    assert_ne!(Mode::Light, Mode::Dark);
}

#[test]
fn existing_derives_are_kept() {
    assert_eq!(Celsius(21.5), Celsius(21.5));
}
