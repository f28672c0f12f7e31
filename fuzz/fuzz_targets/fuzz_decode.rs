#![no_main]

use libfuzzer_sys::fuzz_target;
use quill_codec::{ListCodec, OptionCodec, SchemaBuilder, SchemaRegistry, decode_from_str};

#[derive(Debug, Clone, Default, PartialEq)]
struct Item {
    label: String,
    weight: f64,
    tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Doc {
    id: u64,
    head: Option<Item>,
    items: Vec<Item>,
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::default()
        .with(
            SchemaBuilder::<Item>::new("Item")
                .field(0, "label", |i| &i.label, |i| &mut i.label)
                .field(1, "weight", |i| &i.weight, |i| &mut i.weight)
                .field(2, "tags", |i| &i.tags, |i| &mut i.tags)
                .build()
                .expect("item schema"),
        )
        .with(
            SchemaBuilder::<Doc>::new("Doc")
                .field(0, "id", |d| &d.id, |d| &mut d.id)
                .nested(1, "head", OptionCodec, |d| &d.head, |d| &mut d.head)
                .nested(2, "items", ListCodec, |d| &d.items, |d| &mut d.items)
                .build()
                .expect("doc schema"),
        )
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 8192 {
        return;
    }

    let registry = registry();

    // Decoding arbitrary text must never panic.
    let Ok(Some(doc)) = decode_from_str::<Doc>(&registry, text) else {
        return;
    };

    // Whatever decoded must re-encode to exactly one slot per entry.
    let encoded = registry.encode(&doc).expect("decoded document must encode");
    assert_eq!(encoded.len(), 3, "encoding must emit one slot per entry");

    // And decoding the re-encoded form must reproduce it.
    let again: Doc = registry
        .decode_slots(&encoded)
        .expect("re-encoded document must decode");
    assert_eq!(again, doc, "decode(encode(x)) must equal x");
});
