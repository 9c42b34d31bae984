#![no_main]

use libfuzzer_sys::fuzz_target;
use barista::{JsValue, PropertyAttributes, PropertyCache, PropertyDescriptor, Runtime};

const MAX_OPS: usize = 256;
const KEYS: usize = 8;

// Random set / get / delete / define / extensibility operations on two
// objects sharing a prototype. Every read through a per-key inline cache must
// agree with a full lookup, whatever transitions happened in between.
//
// Each operation is two bytes:
//   byte 0  bits [2:0] operation, bits [7:3] value payload
//   byte 1  bits [2:0] key k0-k7, bit 3 target object, bits [6:4] attributes
fuzz_target!(|data: &[u8]| {
    let mut rt = Runtime::new().unwrap();
    let parent = rt.create_object();
    let objects = [
        rt.create_object_with_prototype(Some(parent.clone())),
        rt.create_object_with_prototype(Some(parent.clone())),
    ];
    let mut caches: Vec<PropertyCache> = (0..KEYS).map(|k| PropertyCache::new(format!("k{k}"))).collect();

    for chunk in data.chunks_exact(2).take(MAX_OPS) {
        let op = chunk[0] & 0x7;
        let value = JsValue::Number(f64::from(chunk[0] >> 3));
        let key_idx = (chunk[1] & 0x7) as usize;
        let key = format!("k{key_idx}");
        let obj = &objects[((chunk[1] >> 3) & 1) as usize];
        let attrs = PropertyAttributes::from_bits_truncate((chunk[1] >> 4) & 0x7);

        match op {
            0 => {
                let _ = obj.set(&mut rt, &key, value, false);
            }
            1 => {
                let _ = caches[key_idx].set(&mut rt, obj, value, false);
            }
            2 => {
                let cached = caches[key_idx].get(&mut rt, obj).unwrap();
                let full = obj.get(&mut rt, &key).unwrap();
                assert_eq!(cached, full, "cached read of {key} diverged");
            }
            3 => {
                let _ = obj.delete(&key, false);
            }
            4 => {
                let _ = obj.define_property(&key, PropertyDescriptor::data(value, attrs), false);
            }
            5 => {
                let _ = parent.set(&mut rt, &key, value, false);
            }
            6 => {
                let _ = parent.delete(&key, false);
            }
            _ => {
                // Rare: latch one object non-extensible
                if chunk[0] >> 3 == 0x1f {
                    obj.prevent_extensions();
                }
            }
        }
    }

    // Post-condition: every key reads the same through the cache as without it
    for obj in &objects {
        for (key_idx, cache) in caches.iter_mut().enumerate() {
            let key = format!("k{key_idx}");
            let cached = cache.get(&mut rt, obj).unwrap();
            let full = obj.get(&mut rt, &key).unwrap();
            assert_eq!(cached, full);
            assert_eq!(
                obj.has_property(&key),
                obj.has_own_property(&key) || parent.has_property(&key)
            );
        }
    }
});
