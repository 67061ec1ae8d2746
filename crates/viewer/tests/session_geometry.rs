use console::measure_text_width;
use proptest::prelude::*;
use std::collections::HashMap;
use wlpv_protocol::Protocol;
use wlpv_store::ProtocolStore;
use wlpv_viewer::{Event, Key, Mode, Session, MARGIN_X, MARGIN_Y};

fn store(count: usize) -> ProtocolStore {
    let protocols = (0..count)
        .map(|i| Protocol {
            name: format!("protocol_with_a_fairly_long_name_{i:03}"),
            copyright: "Copyright © 2024 somebody\n\tindented by a tab".repeat(5),
            ..Protocol::default()
        })
        .collect();
    let mut map = HashMap::new();
    map.insert("stable".to_string(), protocols);
    ProtocolStore::new(map, &["stable".to_string()])
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Enter),
        Just(Key::Esc),
        Just(Key::Char('j')),
        Just(Key::Char('k')),
        Just(Key::Char('G')),
        Just(Key::Char('f')),
        Just(Key::Char('/')),
        Just(Key::Char('1')),
        Just(Key::Backspace),
        Just(Key::PageDown),
        Just(Key::WheelDown),
        Just(Key::Ctrl('u')),
    ]
}

proptest! {
    #[test]
    fn frames_always_fit_the_window(
        count in 0usize..12,
        sizes in prop::collection::vec((0u16..120, 0u16..50), 1..6),
        keys in prop::collection::vec(key_strategy(), 0..30),
    ) {
        let store = store(count);
        let mut session = Session::new(&store, None);

        for (step, (width, height)) in sizes.iter().copied().enumerate() {
            session.update(Event::Resize { width, height });
            for key in keys.iter().skip(step * 5).take(5) {
                session.update(Event::KeyPress(*key));
            }

            let frame = session.render();
            prop_assert!(frame.len() <= height as usize);
            for line in &frame {
                prop_assert!(measure_text_width(line) <= width as usize);
            }

            let list = session.list();
            prop_assert!(list.width() + 2 * MARGIN_X <= (width as usize).max(2 * MARGIN_X));
            prop_assert!(list.height() + 2 * MARGIN_Y <= (height as usize).max(2 * MARGIN_Y));
            if session.mode() == Mode::Pager {
                prop_assert!(session.pager().height() < (height as usize).max(1));
            }
        }
    }
}
