//! JSON loader - turns a JSON document into an explorable object graph
//!
//! Objects become composites exposing each key as a field, arrays become
//! iterables. An object of the form `{"$ref": "#/json/pointer"}` stands for
//! the shared handle of the node it points at, which is how documents
//! express shared and cyclic structure. A few optional metadata keys shape
//! objects further:
//!
//! | key       | effect                                             |
//! |-----------|----------------------------------------------------|
//! | `$type`   | runtime type name (default `Object`)               |
//! | `$short`  | short label used in breadcrumbs                    |
//! | `$level`  | `package`, `module`, `type` or `member`            |
//! | `$display`| text shown instead of the `{N fields}` summary     |
//!
//! Loading never fails outright: an unreadable or malformed file yields a
//! failure root whose `message`, `path` and `kind` are browsable.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use gx_app::Message;
use gx_core::prelude::*;
use gx_core::{
    DynamicObject, ElementLevel, MemberKind, ObjectRef, SequenceObject, TypeDescriptor, Value,
};
use serde_json::{Map, Value as Json};

const JSON_NAMESPACE: &str = "json";
const REF_KEY: &str = "$ref";
const TYPE_KEY: &str = "$type";
const SHORT_KEY: &str = "$short";
const LEVEL_KEY: &str = "$level";
const DISPLAY_KEY: &str = "$display";

/// Longest `$ref` to `$ref` chain followed before giving up.
const MAX_REF_HOPS: usize = 32;

/// A loaded root, ready to hand to the engine.
#[derive(Debug, Clone)]
pub struct LoadedRoot {
    pub name: String,
    pub value: Value,
    pub declared_type: TypeDescriptor,
}

impl LoadedRoot {
    pub fn into_message(self) -> Message {
        Message::LoadRoot {
            name: self.name,
            value: self.value,
            declared_type: self.declared_type,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.value.is_failure()
    }
}

/// Load `path`, producing a failure root instead of an error.
pub fn load_path(path: &Path) -> LoadedRoot {
    match load_file(path) {
        Ok(root) => root,
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            failure_root(path, &e)
        }
    }
}

pub fn load_file(path: &Path) -> Result<LoadedRoot> {
    let text = std::fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    let root = load_str(&name, &text)?;
    info!("Loaded {} from {}", root.name, path.display());
    Ok(root)
}

pub fn load_str(name: &str, text: &str) -> Result<LoadedRoot> {
    let json: Json = serde_json::from_str(text)?;
    Ok(from_json(name, &json))
}

/// Build the graph for an already parsed document.
pub fn from_json(name: &str, json: &Json) -> LoadedRoot {
    let mut builder = GraphBuilder::new(json);
    builder.allocate(json, String::new());
    builder.fill(json, "");
    let value = builder.value_at(json, "");
    debug!("Built {} shared objects", builder.handles.len());
    LoadedRoot {
        name: name.to_string(),
        declared_type: type_of(&value),
        value,
    }
}

/// Error root describing why a file could not be loaded.
pub fn failure_root(path: &Path, error: &Error) -> LoadedRoot {
    let kind = match error {
        Error::Io(_) => "io",
        Error::Json(_) => "json",
        _ => "load",
    };
    let message = match error {
        Error::Io(e) => e.to_string(),
        Error::Json(e) => e.to_string(),
        other => other.to_string(),
    };
    let object = DynamicObject::new(TypeDescriptor::named_in("gx", "LoadError"))
        .with_display(format!("Failed to load {}", path.display()))
        .as_failure()
        .with_field("message", TypeDescriptor::String, message)
        .with_field(
            "path",
            TypeDescriptor::String,
            path.display().to_string(),
        )
        .with_field("kind", TypeDescriptor::String, kind);

    LoadedRoot {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string()),
        value: Value::object(object),
        declared_type: TypeDescriptor::Object,
    }
}

// ─────────────────────────────────────────────────────────────────
// Graph construction
// ─────────────────────────────────────────────────────────────────

enum Handle {
    Object(Rc<DynamicObject>),
    Sequence(Rc<SequenceObject>),
}

impl Handle {
    fn object_ref(&self) -> ObjectRef {
        match self {
            Self::Object(rc) => rc.clone().into(),
            Self::Sequence(rc) => rc.clone().into(),
        }
    }
}

/// Two passes: `allocate` creates one empty handle per object and array
/// keyed by JSON pointer, `fill` then populates members so any `$ref`
/// (including one pointing at an ancestor) resolves to an existing handle.
struct GraphBuilder<'a> {
    document: &'a Json,
    handles: HashMap<String, Handle>,
}

impl<'a> GraphBuilder<'a> {
    fn new(document: &'a Json) -> Self {
        Self {
            document,
            handles: HashMap::new(),
        }
    }

    fn allocate(&mut self, json: &Json, pointer: String) {
        match json {
            Json::Object(map) if reference_of(map).is_some() => {}
            Json::Object(map) => {
                for (key, child) in map.iter().filter(|(key, _)| !is_metadata_key(key)) {
                    self.allocate(child, child_pointer(&pointer, key));
                }
                self.handles
                    .insert(pointer, Handle::Object(Rc::new(new_object(map))));
            }
            Json::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.allocate(child, child_pointer(&pointer, &index.to_string()));
                }
                let sequence = SequenceObject::iterable(TypeDescriptor::named_in(
                    JSON_NAMESPACE,
                    "Array",
                ));
                self.handles
                    .insert(pointer, Handle::Sequence(Rc::new(sequence)));
            }
            _ => {}
        }
    }

    fn fill(&self, json: &Json, pointer: &str) {
        match (json, self.handles.get(pointer)) {
            (Json::Object(map), Some(Handle::Object(object))) => {
                for (key, child) in map.iter().filter(|(key, _)| !is_metadata_key(key)) {
                    let child_ptr = child_pointer(pointer, key);
                    self.fill(child, &child_ptr);
                    let value = self.value_at(child, &child_ptr);
                    object.push(key.as_str(), MemberKind::Field, type_of(&value), Ok(value));
                }
            }
            (Json::Array(items), Some(Handle::Sequence(sequence))) => {
                for (index, child) in items.iter().enumerate() {
                    let child_ptr = child_pointer(pointer, &index.to_string());
                    self.fill(child, &child_ptr);
                    sequence.push(self.value_at(child, &child_ptr));
                }
            }
            _ => {}
        }
    }

    /// Value for the JSON node at `pointer`.
    fn value_at(&self, json: &Json, pointer: &str) -> Value {
        if let Json::Object(map) = json {
            if let Some(target) = reference_of(map) {
                return self.resolve(target);
            }
        }
        match self.handles.get(pointer) {
            Some(handle) => Value::Object(handle.object_ref()),
            None => scalar(json),
        }
    }

    fn resolve(&self, reference: &str) -> Value {
        let mut target = reference;
        for _ in 0..MAX_REF_HOPS {
            let Some(pointer) = target.strip_prefix('#') else {
                return Value::error(format!("Unsupported reference {}", reference));
            };
            let Some(json) = self.document.pointer(pointer) else {
                return Value::error(format!("Unresolved reference {}", reference));
            };
            match json {
                Json::Object(map) => match reference_of(map) {
                    Some(next) => target = next,
                    None => return self.value_at(json, pointer),
                },
                _ => return self.value_at(json, pointer),
            }
        }
        Value::error(format!("Reference chain too long at {}", reference))
    }
}

fn new_object(map: &Map<String, Json>) -> DynamicObject {
    let runtime = match map.get(TYPE_KEY).and_then(Json::as_str) {
        Some(name) => TypeDescriptor::named(name),
        None => TypeDescriptor::named_in(JSON_NAMESPACE, "Object"),
    };
    let fields = map.keys().filter(|key| !is_metadata_key(key)).count();
    let display = match map.get(DISPLAY_KEY).and_then(Json::as_str) {
        Some(display) => display.to_string(),
        None if fields == 1 => "{1 field}".to_string(),
        None => format!("{{{} fields}}", fields),
    };

    let mut object = DynamicObject::new(runtime).with_display(display);
    if let Some(short) = map.get(SHORT_KEY).and_then(Json::as_str) {
        object = object.with_short_name(short);
    }
    if let Some(level) = map.get(LEVEL_KEY).and_then(Json::as_str) {
        match parse_level(level) {
            Some(level) => object = object.with_element_level(level),
            None => warn!("Ignoring unknown element level {:?}", level),
        }
    }
    object
}

fn parse_level(level: &str) -> Option<ElementLevel> {
    match level.to_ascii_lowercase().as_str() {
        "package" => Some(ElementLevel::Package),
        "module" => Some(ElementLevel::Module),
        "type" => Some(ElementLevel::Type),
        "member" => Some(ElementLevel::Member),
        _ => None,
    }
}

fn reference_of(map: &Map<String, Json>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    map.get(REF_KEY).and_then(Json::as_str)
}

fn is_metadata_key(key: &str) -> bool {
    matches!(key, TYPE_KEY | SHORT_KEY | LEVEL_KEY | DISPLAY_KEY)
}

/// RFC 6901 pointer of `key` below `parent`.
fn child_pointer(parent: &str, key: &str) -> String {
    format!("{}/{}", parent, key.replace('~', "~0").replace('/', "~1"))
}

fn scalar(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Value::I32(small),
                    Err(_) => Value::I64(i),
                }
            } else if let Some(u) = n.as_u64() {
                Value::U64(u)
            } else {
                Value::F64(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => Value::str(s.as_str()),
        // Composites always have a handle
        Json::Array(_) | Json::Object(_) => Value::error("Unallocated composite"),
    }
}

/// Declared type of a member holding `value`.
fn type_of(value: &Value) -> TypeDescriptor {
    value.runtime_type().unwrap_or(TypeDescriptor::Object)
}
