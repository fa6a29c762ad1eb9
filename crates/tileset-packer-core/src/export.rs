use crate::model::Atlas;
use serde::Serialize;
use serde_json::{json, Value};

/// Serialize the whole `Atlas` as a JSON object `{ pages, meta }` (array-of-pages style).
/// Suitable for generic tooling and simple consumption.
pub fn to_json_array<K: ToString + Clone + Serialize>(atlas: &Atlas<K>) -> Value {
    let pages_val = atlas
        .pages
        .iter()
        .map(|p| {
            let frames_val: Vec<Value> = p
                .frames
                .iter()
                .map(|fr| {
                    let frame = json!({"x": fr.frame.x, "y": fr.frame.y, "w": fr.frame.w, "h": fr.frame.h});
                    let cells = json!({"x": fr.cells.x, "y": fr.cells.y, "w": fr.cells.w, "h": fr.cells.h});
                    json!({
                        "key": fr.key.to_string(),
                        "frame": frame,
                        "cells": cells,
                    })
                })
                .collect();
            json!({
                "id": p.id,
                "width": p.width,
                "height": p.height,
                "frames": frames_val,
            })
        })
        .collect::<Vec<_>>();
    json!({"pages": pages_val, "meta": &atlas.meta})
}
