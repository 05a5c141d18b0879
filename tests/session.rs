//! Session tests - tabs, autosave restore, save/save-as, close choices

use std::fs;
use std::time::Instant;

use natatnik::editable::{KeyEvent, Position};
use natatnik::settings::TabRecord;
use natatnik::{CloseChoice, Session, Settings};
use tempfile::TempDir;

fn type_keys(session: &mut Session, script: &str) {
    for event in KeyEvent::parse_script(script).unwrap() {
        session.handle_key(event);
    }
}

// ========================================================================
// Restore
// ========================================================================

#[test]
fn test_restore_empty_dir_opens_one_tab() {
    let dir = TempDir::new().unwrap();
    let session = Session::restore(Settings::default(), dir.path().join("autosave"), None).unwrap();
    assert_eq!(session.tabs().len(), 1);
    assert_eq!(session.active().title, "Untitled1");
}

#[test]
fn test_restore_reopens_autosaved_tabs_in_order() {
    let dir = TempDir::new().unwrap();
    let autosave = dir.path().join("autosave");
    fs::create_dir_all(&autosave).unwrap();
    fs::write(autosave.join("Untitled3.txt"), "third\n").unwrap();
    fs::write(autosave.join("Untitled1.txt"), "first\n").unwrap();
    fs::write(autosave.join("ignored.md"), "not a tab").unwrap();

    let mut session = Session::restore(Settings::default(), &autosave, None).unwrap();
    let titles: Vec<_> = session.tabs().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Untitled1", "Untitled3"]);
    assert_eq!(session.tabs()[0].buffer.text(), "first");

    // Counter continues past the highest number found
    session.new_tab(None);
    assert_eq!(session.active().title, "Untitled4");
}

#[test]
fn test_restore_reopens_recorded_files_with_caret() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "one\ntwo\n").unwrap();

    let settings = Settings {
        open_tabs: vec![TabRecord {
            path: file.clone(),
            caret: Position::new(2, 1),
        }],
        ..Settings::default()
    };
    let session = Session::restore(settings, dir.path().join("autosave"), None).unwrap();

    assert_eq!(session.tabs().len(), 1);
    let tab = session.active();
    assert_eq!(tab.title, "notes");
    assert_eq!(tab.buffer.caret(), Position::new(2, 1));
}

#[test]
fn test_autosave_then_restore_round_trip() {
    let dir = TempDir::new().unwrap();
    let autosave = dir.path().join("autosave");
    let settings_path = dir.path().join("settings.json");

    let mut session =
        Session::new(Settings::default(), &autosave).with_settings_path(&settings_path);
    type_keys(&mut session, "say<Space>\"hi\"");
    session.set_show_special(true);
    session.on_closing();

    let settings = Settings::load_from(&settings_path);
    assert!(settings.show_special);
    let restored = Session::restore(settings, &autosave, Some(settings_path)).unwrap();
    let tab = restored.active();
    assert_eq!(tab.buffer.text(), "say «hi»");
    assert_eq!(tab.buffer.display_text(), "say·«hi»");
}

// ========================================================================
// Open / save
// ========================================================================

#[test]
fn test_open_same_file_twice_activates_existing_tab() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("doc.txt");
    fs::write(&file, "content\n").unwrap();

    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    let first = session.open_file(&file).unwrap();
    session.new_tab(None);
    let second = session.open_file(&file).unwrap();

    assert_eq!(first, second);
    assert_eq!(session.tabs().len(), 3);
    assert_eq!(session.active().id, first);
}

#[test]
fn test_crlf_file_edits_at_line_end() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("dos.txt");
    fs::write(&file, "ab\r\ncd\r\n").unwrap();

    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    session.open_file(&file).unwrap();
    type_keys(&mut session, "<End>x");

    let buffer = &session.active().buffer;
    assert_eq!(buffer.text(), "abx\ncd");
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.caret(), Position::new(1, 3));

    session.save_active().unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "abx\ncd\n");
}

#[test]
fn test_open_binary_file_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("blob.bin");
    fs::write(&file, b"\x00\x01\x02").unwrap();

    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    let err = session.open_file(&file).unwrap_err();
    assert_eq!(err.to_string(), "Cannot open binary file: blob.bin");
    assert_eq!(session.tabs().len(), 1);
}

#[test]
fn test_save_writes_literal_text_in_special_mode() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("doc.txt");
    fs::write(&file, "a\n").unwrap();

    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    session.open_file(&file).unwrap();
    session.set_show_special(true);
    session.active_mut().buffer.set_caret(Position::new(1, 1));
    type_keys(&mut session, "<Space>b");

    session.save_active().unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "a b\n");
}

#[test]
fn test_save_as_moves_untitled_out_of_autosave() {
    let dir = TempDir::new().unwrap();
    let autosave = dir.path().join("autosave");
    let mut session = Session::new(Settings::default(), &autosave);
    type_keys(&mut session, "draft");
    session.autosave_all();
    let autosave_file = autosave.join("Untitled1.txt");
    assert!(autosave_file.exists());

    let target = dir.path().join("final.txt");
    session.save_active_as(&target).unwrap();

    assert!(!autosave_file.exists());
    assert_eq!(fs::read_to_string(&target).unwrap(), "draft\n");
    assert_eq!(session.active().title, "final");
    assert!(!session.is_untitled(session.active().id));
}

// ========================================================================
// Close
// ========================================================================

#[test]
fn test_close_untitled_with_save_as() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    type_keys(&mut session, "keep me");
    let id = session.active().id;
    let target = dir.path().join("kept.txt");

    assert!(session.close_tab(id, CloseChoice::SaveAs(target.clone())).unwrap());
    assert_eq!(fs::read_to_string(&target).unwrap(), "keep me\n");
    assert_eq!(session.tabs().len(), 1);
    assert_ne!(session.active().id, id);
}

#[test]
fn test_close_untitled_discard_removes_autosave() {
    let dir = TempDir::new().unwrap();
    let autosave = dir.path().join("autosave");
    let mut session = Session::new(Settings::default(), &autosave);
    session.new_tab(Some("second"));
    session.autosave_all();
    let id = session.active().id;

    assert!(session.close_tab(id, CloseChoice::Discard).unwrap());
    assert!(!autosave.join("Untitled2.txt").exists());
    assert!(autosave.join("Untitled1.txt").exists());
    assert_eq!(session.tabs().len(), 1);
}

#[test]
fn test_close_named_tab_ignores_choice() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("doc.txt");
    fs::write(&file, "x\n").unwrap();

    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    let id = session.open_file(&file).unwrap();
    assert!(session.close_tab(id, CloseChoice::Cancel).unwrap());
    assert!(file.exists());
    assert_eq!(session.tabs().len(), 1);
}

// ========================================================================
// Status and timer
// ========================================================================

#[test]
fn test_visual_line_count_uses_active_tab() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    assert_eq!(session.visual_line_count(80), 1);
    type_keys(&mut session, "one<Enter>two<Enter>");
    assert_eq!(session.visual_line_count(80), 3);
}

#[test]
fn test_first_tick_autosaves() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(Settings::default(), dir.path().join("autosave"));
    assert!(session.tick(Instant::now()));
    assert!(session.active().path.exists());
}
