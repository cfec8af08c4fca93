use delve_terminal::Terminal;
use pretty_assertions::assert_eq;

#[test]
fn cursor_position_and_erase_line_to_eol() {
    let mut term = Terminal::new(2, 5).unwrap();

    term.process(b"abc");
    // CSI coordinates are 1-based: row 1, col 2.
    term.process(b"\x1b[1;2H");
    term.process(b"\x1b[K");

    let rows = term.render_text();
    assert_eq!(rows[0], "a    ");
}

#[test]
fn erase_display_from_cursor() {
    let mut term = Terminal::new(3, 3).unwrap();
    term.process(b"abc\x1b[2;1Hdef\x1b[3;1Hghi");
    term.process(b"\x1b[2;2H\x1b[J");

    assert_eq!(
        term.render_text(),
        vec!["abc".to_string(), "d  ".to_string(), "   ".to_string()]
    );
}

#[test]
fn full_clear_keeps_cursor_in_place() {
    let mut term = Terminal::new(4, 4).unwrap();
    term.process(b"\x1b[3;3Hxy");
    term.process(b"\x1b[2J");

    assert!(term.render_text().iter().all(|row| row.trim().is_empty()));
    // The cursor stayed where the prints left it: clears never move it.
    assert_eq!(term.grid().cursor(), (2, 4));
}

#[test]
fn bottom_row_is_held_without_scrolling() {
    let mut term = Terminal::new(2, 10).unwrap();
    term.process(b"one\r\ntwo\r\nthree\r\nfour");

    let rows = term.render_text();
    // Rows past the bottom overwrite the held bottom row; nothing scrolls.
    assert_eq!(rows[0], "one       ");
    assert_eq!(rows[1], "foure     ");
}

#[test]
fn utf8_output_prints_as_characters() {
    let mut term = Terminal::new(1, 8).unwrap();
    term.process("héllo".as_bytes());
    assert_eq!(term.render_text()[0], "héllo   ");
}

#[test]
fn cursor_visibility_tracks_dectcem() {
    let mut term = Terminal::new(2, 2).unwrap();
    assert!(term.grid().cursor_visible());
    term.process(b"\x1b[?25l");
    assert!(!term.grid().cursor_visible());
    term.process(b"\x1b[?25h");
    assert!(term.grid().cursor_visible());
}

#[test]
fn vpa_and_cha_position_one_axis() {
    let mut term = Terminal::new(10, 10).unwrap();
    term.process(b"\x1b[4d");
    assert_eq!(term.grid().cursor(), (3, 0));
    term.process(b"\x1b[7G");
    assert_eq!(term.grid().cursor(), (3, 6));
}
