//! Memoizing keyframe evaluator.
//!
//! Results are cached per (property id, frame). Each property's cache bucket
//! carries a fingerprint of the property's content, so an edited property
//! invalidates its own bucket on the next request instead of serving stale
//! values. Memoization never changes a result, only its cost.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use hashbrown::HashMap;
use log::{debug, trace};

use crate::config::EvaluatorConfig;
use crate::data::{AnimatableProperty, BezierHandle, Interpolation};
use crate::error::{check_frame, EvalError};
use crate::ids::PropertyId;
use crate::sampling::evaluate_property;
use lattice_api_core::Value;

/// Hit/miss counters, reset by [`KeyframeEvaluator::clear_cache`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct PropertyBucket {
    fingerprint: u64,
    frames: HashMap<u64, Value>,
}

#[derive(Debug, Default)]
pub struct KeyframeEvaluator {
    cfg: EvaluatorConfig,
    buckets: HashMap<PropertyId, PropertyBucket>,
    entries: usize,
    stats: CacheStats,
}

fn hash_value<H: Hasher>(v: &Value, h: &mut H) {
    std::mem::discriminant(v).hash(h);
    match v {
        Value::Number(n) => n.to_bits().hash(h),
        Value::Vec2 { x, y } => {
            x.to_bits().hash(h);
            y.to_bits().hash(h);
        }
        Value::Vec3 { x, y, z } => {
            x.to_bits().hash(h);
            y.to_bits().hash(h);
            z.to_bits().hash(h);
        }
        Value::Color(s) | Value::Text(s) => s.hash(h),
        Value::Array(items) => {
            items.len().hash(h);
            for i in items {
                i.to_bits().hash(h);
            }
        }
        Value::Bool(b) => b.hash(h),
    }
}

fn hash_handle<H: Hasher>(handle: &BezierHandle, h: &mut H) {
    handle.frame.to_bits().hash(h);
    handle.value.to_bits().hash(h);
    handle.enabled.hash(h);
}

/// Content fingerprint covering everything evaluation reads.
fn fingerprint(property: &AnimatableProperty) -> u64 {
    let mut h = DefaultHasher::new();
    property.animated.hash(&mut h);
    hash_value(&property.value, &mut h);
    property.keyframes.len().hash(&mut h);
    for k in &property.keyframes {
        k.frame.to_bits().hash(&mut h);
        hash_value(&k.value, &mut h);
        match k.interpolation {
            Interpolation::Easing(id) => {
                3u8.hash(&mut h);
                id.hash(&mut h);
            }
            other => std::mem::discriminant(&other).hash(&mut h),
        }
        hash_handle(&k.in_handle, &mut h);
        hash_handle(&k.out_handle, &mut h);
    }
    h.finish()
}

/// Cache key for a frame; -0.0 and 0.0 share an entry.
#[inline]
fn frame_key(frame: f64) -> u64 {
    if frame == 0.0 {
        0.0f64.to_bits()
    } else {
        frame.to_bits()
    }
}

impl KeyframeEvaluator {
    pub fn new(cfg: EvaluatorConfig) -> Self {
        Self {
            cfg,
            buckets: HashMap::new(),
            entries: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.cfg
    }

    /// Value of `property` at `frame`.
    ///
    /// Non-finite frames are rejected before the cache is touched.
    pub fn evaluate(
        &mut self,
        property: &AnimatableProperty,
        frame: f64,
    ) -> Result<Value, EvalError> {
        let frame = check_frame(frame)?;
        if property.is_static() {
            return Ok(property.value.clone());
        }
        if self.cfg.cache_capacity == 0 {
            return evaluate_property(property, frame);
        }

        let fp = fingerprint(property);
        let key = frame_key(frame);

        if let Some(bucket) = self.buckets.get_mut(&property.id) {
            if bucket.fingerprint == fp {
                if let Some(v) = bucket.frames.get(&key) {
                    trace!("cache hit {} @ {}", property.id, frame);
                    self.stats.hits += 1;
                    return Ok(v.clone());
                }
            } else {
                debug!("property '{}' changed, dropping its cached frames", property.id);
                self.entries -= bucket.frames.len();
                bucket.frames.clear();
                bucket.fingerprint = fp;
            }
        }

        self.stats.misses += 1;
        let value = evaluate_property(property, frame)?;

        if self.entries >= self.cfg.cache_capacity {
            debug!("evaluation cache full ({} entries), flushing", self.entries);
            self.buckets.clear();
            self.entries = 0;
        }
        let bucket = self
            .buckets
            .entry(property.id.clone())
            .or_insert_with(|| PropertyBucket {
                fingerprint: fp,
                frames: HashMap::new(),
            });
        if bucket.frames.insert(key, value.clone()).is_none() {
            self.entries += 1;
        }
        Ok(value)
    }

    /// Evaluate as a number; non-numeric results coerce like the api-core helpers.
    pub fn evaluate_number(
        &mut self,
        property: &AnimatableProperty,
        frame: f64,
    ) -> Result<f32, EvalError> {
        self.evaluate(property, frame)
            .map(|v| lattice_api_core::coercion::to_number(&v))
    }

    /// Drop every memoized result. Subsequent results are unchanged.
    pub fn clear_cache(&mut self) {
        self.buckets.clear();
        self.entries = 0;
        self.stats = CacheStats::default();
    }

    /// Drop memoized results for one property.
    pub fn invalidate(&mut self, id: &PropertyId) {
        if let Some(bucket) = self.buckets.remove(id) {
            self.entries -= bucket.frames.len();
        }
    }

    pub fn cache_len(&self) -> usize {
        self.entries
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
