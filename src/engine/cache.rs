// ==========================================
// 供应链场景分析引擎 - 计算缓存
// ==========================================
// 职责: 按不可变输入签名记忆计算结果
// 规则: 每个键只写一次, 永不失效 (输入加载后不可变)
//       并发写同一键是安全的: 所有写者算出同一个值
// ==========================================

use crate::domain::types::ScenarioMetric;
use crate::engine::normalizer::MetricSpec;
use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// 归一化缓存键: 有序场景名 + 有序指标集
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizationKey {
    scenarios: Vec<String>,
    metrics: Vec<MetricSpec>,
}

impl NormalizationKey {
    pub fn new(scenarios: &[String], metrics: &[MetricSpec]) -> Self {
        Self {
            scenarios: scenarios.to_vec(),
            metrics: metrics.to_vec(),
        }
    }

    pub fn metric_ids(&self) -> Vec<ScenarioMetric> {
        self.metrics.iter().map(|m| m.metric).collect()
    }
}

// ==========================================
// ComputeCache - 读穿缓存
// ==========================================
#[derive(Debug)]
pub struct ComputeCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for ComputeCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> ComputeCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        // 写者只做插入, 锁中毒不影响已有数据
        let guard = self.entries.read().unwrap_or_else(|e| e.into_inner());
        guard.get(key).cloned()
    }

    /// 命中则返回缓存值, 否则计算并写入; 计算失败不写入
    pub fn get_or_try_insert_with<E, F>(&self, key: K, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        // 计算期间不持锁
        let value = Arc::new(compute()?);

        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Ok(guard.entry(key).or_insert(value).clone())
    }

    /// 不会失败的计算
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        match self.get_or_try_insert_with(key, || Ok::<V, Infallible>(compute())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_compute_once_per_key() {
        let cache: ComputeCache<u32, String> = ComputeCache::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let v = cache
                .get_or_try_insert_with(1, || {
                    calls.set(calls.get() + 1);
                    Ok::<_, ()>("one".to_string())
                })
                .unwrap();
            assert_eq!(v.as_str(), "one");
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: ComputeCache<u32, u32> = ComputeCache::new();
        let err = cache.get_or_try_insert_with(7, || Err::<u32, &str>("boom"));
        assert_eq!(err.unwrap_err(), "boom");
        assert!(cache.is_empty());

        let ok = cache.get_or_try_insert_with(7, || Ok::<u32, &str>(49)).unwrap();
        assert_eq!(*ok, 49);
    }

    #[test]
    fn test_infallible_insert() {
        let cache: ComputeCache<&str, usize> = ComputeCache::new();
        let a = cache.get_or_insert_with("k", || 1);
        let b = cache.get_or_insert_with("k", || 2);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, 1);
    }

    #[test]
    fn test_normalization_key_depends_on_scenario_set() {
        let metrics = [MetricSpec::with_default_direction(ScenarioMetric::TotalCost)];
        let a = NormalizationKey::new(&["Baseline".to_string()], &metrics);
        let b = NormalizationKey::new(
            &["Baseline".to_string(), "LowCost".to_string()],
            &metrics,
        );
        assert_ne!(a, b);
        assert_eq!(a.metric_ids(), vec![ScenarioMetric::TotalCost]);
    }

    #[test]
    fn test_concurrent_population_is_consistent() {
        let cache: Arc<ComputeCache<String, u64>> = Arc::new(ComputeCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    *cache
                        .get_or_try_insert_with("k".to_string(), || Ok::<u64, ()>(42))
                        .unwrap()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 42);
        }
        assert_eq!(cache.len(), 1);
    }
}
