//! Integration tests for the key classification system

use super::*;

fn stroke(key: KeyCode) -> Keystroke {
    Keystroke::key(key)
}

fn ctrl(c: char) -> Keystroke {
    Keystroke::new(KeyCode::Char(c), Modifiers::CTRL)
}

#[test]
fn test_default_denied_shortcuts() {
    let classifier = default_classifier();
    for c in ['b', 'i', 'u', 'z', 'o', 's', 'x'] {
        assert!(
            classifier.is(KeyCategory::Denied, &ctrl(c)),
            "ctrl+{} should be denied",
            c
        );
        assert!(!classifier.is(KeyCategory::Denied, &Keystroke::char(c)));
    }
    assert!(classifier.is(KeyCategory::Denied, &stroke(KeyCode::Tab)));
    assert!(classifier.is(KeyCategory::Denied, &stroke(KeyCode::CapsLock)));
}

#[test]
fn test_default_paste() {
    let classifier = default_classifier();
    assert!(classifier.is(KeyCategory::Paste, &ctrl('v')));
    assert!(classifier.is(
        KeyCategory::Paste,
        &Keystroke::new(KeyCode::Insert, Modifiers::SHIFT)
    ));
    assert!(classifier.is_swallowed(&ctrl('v')));
}

#[test]
fn test_default_movement() {
    let classifier = default_classifier();
    for key in [KeyCode::Left, KeyCode::Right, KeyCode::Home, KeyCode::End] {
        assert_eq!(classifier.classify(&stroke(key)), Some(KeyCategory::HorizontalMove));
    }
    for key in [KeyCode::Up, KeyCode::Down, KeyCode::PageUp, KeyCode::PageDown] {
        assert_eq!(classifier.classify(&stroke(key)), Some(KeyCategory::VerticalMove));
    }
}

#[test]
fn test_default_changeless() {
    let classifier = default_classifier();
    assert!(classifier.is(KeyCategory::Changeless, &stroke(KeyCode::Shift)));
    assert!(classifier.is(KeyCategory::Changeless, &stroke(KeyCode::F(5))));
    assert!(!classifier.is(KeyCategory::Changeless, &stroke(KeyCode::F(13))));
}

#[test]
fn test_default_single_operations() {
    let classifier = default_classifier();
    for c in "+-*/()><=!,".chars() {
        assert!(
            classifier.is_single_operation(&Keystroke::char(c)),
            "{} should be a single operation",
            c
        );
    }
    assert!(!classifier.is_single_operation(&Keystroke::char('.')));
    assert!(!classifier.is_single_operation(&Keystroke::char('a')));
}

#[test]
fn test_default_command_key() {
    let classifier = default_classifier();
    assert!(classifier.is_command(&Keystroke::char('@')));
    // Layouts that need shift for "@" still trigger it
    assert!(classifier.is_command(&Keystroke::new(KeyCode::Char('@'), Modifiers::SHIFT)));
    // AltGr reports ctrl+alt
    assert!(!classifier.is_command(&Keystroke::new(
        KeyCode::Char('@'),
        Modifiers::CTRL | Modifiers::ALT
    )));
}

#[test]
fn test_plain_characters_are_unclassified() {
    let classifier = default_classifier();
    for c in ['a', 'Z', '1', '.', '"', ' '] {
        assert_eq!(classifier.classify(&Keystroke::char(c)), None);
    }
}

#[test]
fn test_staged_deletion_keepers() {
    let classifier = default_classifier();
    assert!(classifier.keeps_staged_deletion(&stroke(KeyCode::Backspace)));
    assert!(classifier.keeps_staged_deletion(&stroke(KeyCode::Escape)));
    assert!(classifier.keeps_staged_deletion(&stroke(KeyCode::Down)));
    assert!(classifier.keeps_staged_deletion(&stroke(KeyCode::Enter)));
    assert!(!classifier.keeps_staged_deletion(&stroke(KeyCode::Left)));
    assert!(!classifier.keeps_staged_deletion(&Keystroke::char('a')));
}

#[test]
fn test_user_yaml_extends_defaults() {
    let mut classifier = default_classifier();
    let user = parse_key_classes_yaml("denied:\n  - \"ctrl+p\"\n").unwrap();
    classifier.merge(user);
    assert!(classifier.is(KeyCategory::Denied, &ctrl('p')));
    assert!(classifier.is(KeyCategory::Denied, &ctrl('b')));
}
