//! Decoder for Solr's XML response writer (`wt=xml`).
//!
//! Solr XML responses are a tree of typed elements: `lst` (named list),
//! `arr` (array), `result` (document list), `doc`, and scalar elements such as
//! `str`, `int` or `bool`. Named children carry their key in a `name`
//! attribute. The decoder turns that tree into the JSON object the JSON
//! response writer would have produced with `json.nl=map`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Number, Value};

use crate::error::{LucernaError, Result};

enum Frame {
    Object {
        name: Option<String>,
        map: Map<String, Value>,
    },
    Array {
        name: Option<String>,
        items: Vec<Value>,
    },
    DocList {
        name: Option<String>,
        header: Map<String, Value>,
        docs: Vec<Value>,
    },
    Scalar {
        name: Option<String>,
        tag: String,
        text: String,
    },
}

/// Decode a Solr XML response body into a JSON object.
pub fn decode_solr_xml(body: &str) -> Result<Map<String, Value>> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Map<String, Value>> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(open_frame(&e)?),
            Ok(Event::Empty(e)) => {
                let frame = open_frame(&e)?;
                close_frame(frame, &mut stack, &mut root)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(Frame::Scalar { text, .. }) = stack.last_mut() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| LucernaError::xml(format!("invalid text: {e}")))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(Frame::Scalar { text, .. }) = stack.last_mut() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| LucernaError::xml("unbalanced closing element"))?;
                close_frame(frame, &mut stack, &mut root)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LucernaError::xml(format!(
                    "error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(LucernaError::xml("unexpected end of document"));
    }
    root.ok_or_else(|| LucernaError::xml("response has no root element"))
}

fn open_frame(element: &BytesStart<'_>) -> Result<Frame> {
    let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut name = None;
    let mut attributes = Map::new();

    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|e| LucernaError::xml(format!("invalid attribute: {e}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| LucernaError::xml(format!("invalid attribute value: {e}")))?
            .into_owned();
        if key == "name" {
            name = Some(value);
        } else {
            attributes.insert(key, Value::String(value));
        }
    }

    Ok(match tag.as_str() {
        "response" | "lst" | "doc" => Frame::Object {
            name,
            map: Map::new(),
        },
        "arr" => Frame::Array {
            name,
            items: Vec::new(),
        },
        "result" => {
            let mut header = Map::new();
            for (key, value) in attributes {
                let text = value.as_str().unwrap_or_default();
                let value = match key.as_str() {
                    "numFound" | "start" => scalar_value("long", text)?,
                    "maxScore" => scalar_value("float", text)?,
                    "numFoundExact" => scalar_value("bool", text)?,
                    _ => value,
                };
                header.insert(key, value);
            }
            Frame::DocList {
                name,
                header,
                docs: Vec::new(),
            }
        }
        _ => Frame::Scalar {
            name,
            tag,
            text: String::new(),
        },
    })
}

fn close_frame(
    frame: Frame,
    stack: &mut [Frame],
    root: &mut Option<Map<String, Value>>,
) -> Result<()> {
    let (name, value) = match frame {
        Frame::Object { name, map } => (name, Value::Object(map)),
        Frame::Array { name, items } => (name, Value::Array(items)),
        Frame::DocList {
            name,
            mut header,
            docs,
        } => {
            header.insert("docs".to_string(), Value::Array(docs));
            (name, Value::Object(header))
        }
        Frame::Scalar { name, tag, text } => (name, scalar_value(&tag, &text)?),
    };

    match stack.last_mut() {
        None => match value {
            Value::Object(map) => {
                *root = Some(map);
                Ok(())
            }
            other => Err(LucernaError::xml(format!(
                "root element must be a list, got {other}"
            ))),
        },
        Some(Frame::Object { map, .. }) => {
            map.insert(name.unwrap_or_default(), value);
            Ok(())
        }
        Some(Frame::Array { items, .. }) => {
            items.push(value);
            Ok(())
        }
        Some(Frame::DocList { docs, .. }) => {
            docs.push(value);
            Ok(())
        }
        Some(Frame::Scalar { tag, .. }) => Err(LucernaError::xml(format!(
            "scalar element <{tag}> cannot contain child elements"
        ))),
    }
}

fn scalar_value(tag: &str, text: &str) -> Result<Value> {
    let invalid = |kind: &str| LucernaError::xml(format!("invalid {kind} value: {text:?}"));
    Ok(match tag {
        "int" | "long" | "short" | "byte" => {
            Value::Number(text.trim().parse::<i64>().map_err(|_| invalid(tag))?.into())
        }
        "float" | "double" => {
            let number = text.trim().parse::<f64>().map_err(|_| invalid(tag))?;
            // NaN and infinities have no JSON number form
            Number::from_f64(number)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(text.trim().to_string()))
        }
        "bool" => match text.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(invalid(tag)),
        },
        "null" => Value::Null,
        _ => Value::String(text.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_select_response() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <lst name="responseHeader">
    <int name="status">0</int>
    <int name="QTime">2</int>
  </lst>
  <result name="response" numFound="2" start="0" maxScore="1.5">
    <doc>
      <str name="id">a&amp;b</str>
      <arr name="cat"><str>book</str><str>tech</str></arr>
      <float name="price">9.5</float>
      <bool name="inStock">true</bool>
    </doc>
    <doc>
      <str name="id">c</str>
      <null name="missing"/>
    </doc>
  </result>
</response>"#;

        let data = decode_solr_xml(body).unwrap();
        assert_eq!(
            Value::Object(data),
            json!({
                "responseHeader": {"status": 0, "QTime": 2},
                "response": {
                    "numFound": 2,
                    "start": 0,
                    "maxScore": 1.5,
                    "docs": [
                        {"id": "a&b", "cat": ["book", "tech"], "price": 9.5, "inStock": true},
                        {"id": "c", "missing": null}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_decode_rejects_bad_numbers() {
        let body = r#"<response><int name="status">zero</int></response>"#;
        assert!(decode_solr_xml(body).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_document() {
        let body = r#"<response><lst name="responseHeader">"#;
        assert!(decode_solr_xml(body).is_err());
    }
}
