//! Marshaling between `serde_json::Value` and script values

use crate::error::JsError;
use crate::object::{JsObjectRef, ObjectKind};
use crate::prelude::FxHashSet;
use crate::runtime::Runtime;
use crate::value::{CheapClone, JsValue};

/// Build a script value from JSON. Arrays become array-like objects.
pub fn json_to_js_value(rt: &mut Runtime, json: &serde_json::Value) -> Result<JsValue, JsError> {
    Ok(match json {
        serde_json::Value::Null => JsValue::Null,
        serde_json::Value::Bool(b) => JsValue::Boolean(*b),
        serde_json::Value::Number(n) => JsValue::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => JsValue::from(s.as_str()),
        serde_json::Value::Array(arr) => {
            let elements = arr
                .iter()
                .map(|item| json_to_js_value(rt, item))
                .collect::<Result<Vec<_>, _>>()?;
            JsValue::Object(rt.create_array(elements)?)
        }
        serde_json::Value::Object(map) => {
            let obj = rt.create_object();
            for (key, value) in map {
                let value = json_to_js_value(rt, value)?;
                obj.set(rt, key, value, true)?;
            }
            JsValue::Object(obj)
        }
    })
}

/// Serialize a script value to JSON.
///
/// Objects contribute their enumerable own properties (getters run).
/// Functions and `undefined` are skipped inside objects and become `null`
/// inside arrays or at the top level. Cyclic structures are a TypeError.
pub fn js_value_to_json(rt: &mut Runtime, value: &JsValue) -> Result<serde_json::Value, JsError> {
    let mut visiting = FxHashSet::default();
    to_json(rt, value, &mut visiting)
}

fn to_json(
    rt: &mut Runtime,
    value: &JsValue,
    visiting: &mut FxHashSet<usize>,
) -> Result<serde_json::Value, JsError> {
    Ok(match value {
        JsValue::Undefined | JsValue::Null => serde_json::Value::Null,
        JsValue::Boolean(b) => serde_json::Value::Bool(*b),
        JsValue::Number(n) => number_to_json(*n),
        JsValue::String(s) => serde_json::Value::String(s.to_string()),
        JsValue::Object(obj) => {
            if obj.is_callable() {
                return Ok(serde_json::Value::Null);
            }
            if !visiting.insert(obj.addr()) {
                return Err(JsError::type_error("Converting circular structure to JSON"));
            }
            let result = object_to_json(rt, obj, visiting);
            visiting.remove(&obj.addr());
            result?
        }
    })
}

fn object_to_json(
    rt: &mut Runtime,
    obj: &JsObjectRef,
    visiting: &mut FxHashSet<usize>,
) -> Result<serde_json::Value, JsError> {
    let array_length = match obj.borrow().kind() {
        ObjectKind::Array { length } => Some(*length),
        _ => None,
    };
    if let Some(length) = array_length {
        let mut arr = Vec::with_capacity(length.min(1024) as usize);
        for i in 0..length {
            let item = obj.get_index(rt, i)?;
            arr.push(to_json(rt, &item, visiting)?);
        }
        return Ok(serde_json::Value::Array(arr));
    }

    let mut map = serde_json::Map::new();
    for (key, desc) in obj.properties() {
        if !desc.is_enumerable() {
            continue;
        }
        let item = obj.get(rt, key.as_str())?;
        if item.is_undefined() || item.is_callable() {
            continue;
        }
        map.insert(key.to_string(), to_json(rt, &item, visiting)?);
    }
    Ok(serde_json::Value::Object(map))
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number(serde_json::Number::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl Runtime {
    /// See [`json_to_js_value`]
    pub fn value_from_json(&mut self, json: &serde_json::Value) -> Result<JsValue, JsError> {
        json_to_js_value(self, json)
    }

    /// See [`js_value_to_json`]
    pub fn value_to_json(&mut self, value: &JsValue) -> Result<serde_json::Value, JsError> {
        js_value_to_json(self, value)
    }

    /// Parse JSON text into a script value
    pub fn parse_json(&mut self, text: &str) -> Result<JsValue, JsError> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| JsError::type_error(format!("Invalid JSON: {}", e)))?;
        json_to_js_value(self, &json)
    }
}
