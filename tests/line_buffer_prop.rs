//! Reversible command property tests
//!
//! Every command applied to an arbitrary buffer must undo back to the exact
//! previous state, and failing commands must not change anything.

use lineed::buffer::LineBuffer;
use lineed::editor::{EditCommand, LineEditor};
use lineed::error::BufferError;
use lineed::file::VecLineSource;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn small_lines() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z ]{0,8}", 0..12)
}

fn buffer_strategy() -> impl Strategy<Value = LineBuffer> {
    (small_lines(), 0usize..16).prop_map(|(lines, current)| {
        let mut buffer = LineBuffer::from_lines(lines);
        if buffer.size() > 0 {
            let _ = buffer.goto_line(current % buffer.size() + 1);
        }
        buffer
    })
}

fn command_strategy() -> impl Strategy<Value = EditCommand> {
    prop_oneof![
        (0usize..16, small_lines()).prop_map(|(after, lines)| EditCommand::InsertLines { after, lines }),
        (0usize..16, 0usize..16).prop_map(|(start, end)| EditCommand::DeleteLines { start, end }),
        (0usize..16).prop_map(|line| EditCommand::Goto { line }),
        small_lines().prop_map(|lines| EditCommand::BulkReplace { lines }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn apply_then_undo_restores_buffer(
        buffer in buffer_strategy(),
        command in command_strategy()
    ) {
        let mut working = buffer.clone();
        match command.apply(&mut working) {
            Ok(applied) => {
                prop_assert!(working.current_line_number() <= working.size());
                prop_assert_eq!(working.current_line_number() == 0, working.size() == 0);
                applied.undo(&mut working).unwrap();
                prop_assert_eq!(working, buffer);
            }
            Err(_) => prop_assert_eq!(working, buffer),
        }
    }

    #[test]
    fn ranges_return_exact_line_counts(
        buffer in buffer_strategy(),
        start in 0usize..16,
        end in 0usize..16
    ) {
        let valid = start >= 1 && start <= end && end <= buffer.size();
        match buffer.lines_in_range(start, end) {
            Ok(lines) => {
                if valid {
                    prop_assert_eq!(lines.len(), end - start + 1);
                    prop_assert_eq!(lines, &buffer.lines()[start - 1..end]);
                } else {
                    // only the empty-buffer sentinel succeeds outside the valid range
                    prop_assert!(buffer.size() == 0 && start == 0 && end == 0);
                }
            }
            Err(err) => {
                prop_assert!(!valid);
                let is_range_error = matches!(err, BufferError::Range { .. });
                prop_assert!(is_range_error);
            }
        }
    }

    #[test]
    fn failed_engine_operations_keep_undo_slot(
        initial in small_lines(),
        start in 0usize..20,
        end in 0usize..20
    ) {
        let mut editor = LineEditor::new();
        editor.read_buffer(&mut VecLineSource::new(initial.clone())).unwrap();
        let before = editor.buffer().clone();

        if editor.delete_lines(start, end).is_err() {
            prop_assert_eq!(editor.buffer(), &before);
            // the load is still the held command, so undo empties the buffer
            editor.undo().unwrap();
            prop_assert_eq!(editor.size(), 0);
        } else {
            editor.undo().unwrap();
            prop_assert_eq!(editor.buffer(), &before);
        }
    }
}
