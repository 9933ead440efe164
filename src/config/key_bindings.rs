use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Submit,
    CopyShortUrl,
    LookupShortUrl,
    ToggleHelp,
    ToggleLogs,
    Quit,
}

/// Fixed key map for the shortener form.
///
/// Keys that map to nothing go to the text input.
pub fn action_for(key: &KeyEvent) -> Option<FormAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(FormAction::Submit),
        KeyCode::Esc => Some(FormAction::Quit),
        KeyCode::F(1) => Some(FormAction::ToggleHelp),
        KeyCode::F(5) => Some(FormAction::ToggleLogs),
        KeyCode::Char('c') if ctrl => Some(FormAction::Quit),
        KeyCode::Char('y') if ctrl => Some(FormAction::CopyShortUrl),
        KeyCode::Char('l') if ctrl => Some(FormAction::LookupShortUrl),
        _ => None,
    }
}

/// Key hints for the help popup, in display order
pub fn key_hints() -> &'static [(&'static str, &'static str)] {
    &[
        ("Enter", "Shorten the URL"),
        ("Ctrl+Y", "Copy the short URL"),
        ("Ctrl+L", "Look up where the short URL points"),
        ("F5", "Toggle the log panel"),
        ("F1", "Toggle this help"),
        ("Esc / Ctrl+C", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_keys() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::empty());
        assert_eq!(action_for(&enter), Some(FormAction::Submit));

        let copy = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&copy), Some(FormAction::CopyShortUrl));

        let quit = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&quit), Some(FormAction::Quit));

        let logs = KeyEvent::new(KeyCode::F(5), KeyModifiers::empty());
        assert_eq!(action_for(&logs), Some(FormAction::ToggleLogs));
    }

    #[test]
    fn test_plain_chars_go_to_input() {
        let y = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::empty());
        assert_eq!(action_for(&y), None);

        let slash = KeyEvent::new(KeyCode::Char('/'), KeyModifiers::empty());
        assert_eq!(action_for(&slash), None);
    }
}
