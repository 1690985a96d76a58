use fixtures::*;

use bxml::decoder::DecoderExt;
use bxml::{
    ChoiceDecoder, DateDecoder, DecodeError, Decoder, ElementName, Event, EventCursor, EventKind,
    EventStream, GenericValueDecoder, PrimitiveArray, PrimitiveDecoder, PrimitiveListDecoder,
    SequenceDecoder, StringDecoder, Structured, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn geometry_aware() -> GenericValueDecoder {
    GenericValueDecoder::with_geometry_and_envelope(PointDecoder, EnvelopeDecoder)
}

#[test]
fn test_every_element_decoder_returns_none_for_empty_elements() {
    ensure_env_logger_initialized();
    let empty = || {
        EventStream::builder()
            .start("x")
            .end("x")
            .build()
            .unwrap()
    };

    assert_eq!(PrimitiveDecoder::<i32>::new("x").decode(&mut empty()).unwrap(), None);
    assert_eq!(PrimitiveListDecoder::<i64>::new("x").decode(&mut empty()).unwrap(), None);
    assert_eq!(StringDecoder::new("x").decode(&mut empty()).unwrap(), None);
    assert_eq!(DateDecoder::new("x").decode(&mut empty()).unwrap(), None);
    assert_eq!(geometry_aware().decode(&mut empty()).unwrap(), None);
}

#[test]
fn test_decoders_reject_foreign_elements() {
    let foreign = || {
        EventStream::builder()
            .start("y")
            .ints([1])
            .end("y")
            .build()
            .unwrap()
    };

    let errors = vec![
        PrimitiveDecoder::<i32>::new("x").decode(&mut foreign()).unwrap_err(),
        PrimitiveListDecoder::<i32>::new("x").decode(&mut foreign()).unwrap_err(),
        StringDecoder::new("x").decode(&mut foreign()).unwrap_err(),
        DateDecoder::new("x").decode(&mut foreign()).unwrap_err(),
    ];

    for err in errors {
        assert!(err.is_structural_mismatch(), "unexpected error {:?}", err);
        assert_eq!(err.position(), Some(0));
    }
}

#[test]
fn test_decoders_require_a_start_element() {
    let mut stream = EventStream::builder().ints([1]).end("x").build().unwrap();

    let err = PrimitiveDecoder::<i32>::new("x").decode(&mut stream).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnexpectedEvent {
            expected: EventKind::StartElement,
            found: EventKind::ValueInt,
            ..
        }
    ));
}

#[test]
fn test_generic_value_dispatches_to_geometry() {
    ensure_env_logger_initialized();
    let mut stream = EventStream::builder()
        .start("the_geom")
        .start(gml("Point"))
        .element(gml("pos"), [Event::Double(vec![10.0, 20.0])])
        .end(gml("Point"))
        .end("the_geom")
        .build()
        .unwrap();

    let value = geometry_aware().decode(&mut stream).unwrap();
    assert_eq!(
        value,
        Some(Value::Structured(Structured {
            name: gml("Point"),
            content: json!({ "type": "Point", "coordinates": [10.0, 20.0] }),
        }))
    );
    assert_eq!(stream.event_kind(), EventKind::EndElement);
    assert!(stream.is_last());
}

#[test]
fn test_generic_value_dispatches_to_envelope() {
    let mut stream = EventStream::builder()
        .start("bounds")
        .start(gml("Envelope"))
        .element(gml("lowerCorner"), [Event::String("0 1".to_string())])
        .element(gml("upperCorner"), [Event::Double(vec![2.0, 3.0])])
        .end(gml("Envelope"))
        .end("bounds")
        .build()
        .unwrap();

    let value = geometry_aware().decode(&mut stream).unwrap().unwrap();
    assert_eq!(
        serde_json::Value::from(&value),
        json!({ "bbox": [0.0, 1.0, 2.0, 3.0] })
    );
}

#[test]
fn test_generic_value_catches_overreaching_decoders() {
    let decoder = GenericValueDecoder::new(ChoiceDecoder::new().with_option(OverreachingDecoder));
    let mut stream = EventStream::builder()
        .start("the_geom")
        .start(gml("Point"))
        .end(gml("Point"))
        .end("the_geom")
        .build()
        .unwrap();

    let err = decoder.decode(&mut stream).unwrap_err();
    assert!(err.is_structural_mismatch());
}

#[test]
fn test_generic_value_rejects_trailing_siblings() {
    let mut stream = EventStream::builder()
        .start("the_geom")
        .start(gml("Point"))
        .element(gml("pos"), [Event::Double(vec![1.0, 2.0])])
        .end(gml("Point"))
        .start(gml("Point"))
        .end(gml("Point"))
        .end("the_geom")
        .build()
        .unwrap();

    let err = geometry_aware().decode(&mut stream).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnexpectedEvent {
            expected: EventKind::EndElement,
            found: EventKind::StartElement,
            ..
        }
    ));
}

#[test]
fn test_generic_value_unknown_nested_element() {
    let mut stream = EventStream::builder()
        .start("the_geom")
        .start(gml("Polygon"))
        .end(gml("Polygon"))
        .end("the_geom")
        .build()
        .unwrap();

    let err = geometry_aware().decode(&mut stream).unwrap_err();
    match err {
        DecodeError::NoMatchingDecoder { name, position } => {
            assert_eq!(name, gml("Polygon"));
            assert_eq!(position, 1);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_can_handle_does_not_touch_the_cursor() {
    let decoders: Vec<Box<dyn Decoder<Output = Value> + Send + Sync>> = vec![
        Box::new(PrimitiveDecoder::<Value>::new("x")),
        Box::new(geometry_aware()),
        Box::new(ChoiceDecoder::new().with_option(PointDecoder)),
        Box::new(StringDecoder::new("x").map(Value::String)),
    ];
    let stream = EventStream::builder()
        .start(gml("Point"))
        .end(gml("Point"))
        .build()
        .unwrap();
    let name = stream.element_name().unwrap().clone();

    for decoder in &decoders {
        let first = decoder.can_handle(&name);
        for _ in 0..5 {
            assert_eq!(decoder.can_handle(&name), first);
        }
    }
    assert_eq!(stream.index(), 0);
    assert_eq!(stream.event_kind(), EventKind::StartElement);
}

#[test]
fn test_feature_walk() {
    ensure_env_logger_initialized();
    let registered = ChoiceDecoder::new()
        .with_option(DateDecoder::new("created").map(Value::Date))
        .with_option(
            PrimitiveListDecoder::<i32>::new("ids")
                .map(|ids| Value::Array(PrimitiveArray::Int(ids))),
        );
    let decoder = SequenceDecoder::new(
        Some(ElementName::local("road")),
        registered,
        geometry_aware(),
    );

    let mut stream = EventStream::builder()
        .start("road")
        .element("name", [Event::String("Main".to_string()), Event::String(" St".to_string())])
        .element("lanes", [Event::Int(vec![4])])
        .element("ids", [Event::String("1 2".to_string()), Event::Int(vec![3])])
        .element("created", [Event::String("2020-05-01T12:00:00Z".to_string())])
        .start("geom")
        .start(gml("Point"))
        .element(gml("pos"), [Event::Double(vec![1.5, 2.5])])
        .end(gml("Point"))
        .end("geom")
        .end("road")
        .build()
        .unwrap();

    let properties = decoder.decode(&mut stream).unwrap().unwrap();
    let names: Vec<String> = properties.iter().map(|(name, _)| name.to_string()).collect();
    assert_eq!(names, vec!["name", "lanes", "ids", "created", "geom"]);

    let values: Vec<serde_json::Value> = properties
        .iter()
        .map(|(_, value)| serde_json::Value::from(value.as_ref().unwrap()))
        .collect();
    assert_eq!(
        values,
        vec![
            json!("Main St"),
            json!(4),
            json!([1, 2, 3]),
            json!("2020-05-01T12:00:00Z"),
            json!({ "type": "Point", "coordinates": [1.5, 2.5] }),
        ]
    );
    assert!(stream.is_last());
}

#[test]
fn test_decoders_can_be_shared_between_threads() {
    let decoder = Arc::new(geometry_aware());

    std::thread::scope(|scope| {
        for i in 0..4 {
            let decoder = Arc::clone(&decoder);
            scope.spawn(move || {
                let mut stream = EventStream::builder()
                    .start("v")
                    .longs([i, i + 1])
                    .end("v")
                    .build()
                    .unwrap();
                assert_eq!(
                    decoder.decode(&mut stream).unwrap(),
                    Some(Value::Array(PrimitiveArray::Long(vec![i, i + 1])))
                );
            });
        }
    });
}
