//! Smoke-test scenario exercising insert, query and rename end to end

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::TripleIndexCache;
use crate::config::{CacheConfig, DemoConfig};
use crate::errors::AppResult;
use crate::models::{ImageHandle, IndexStats, RecordSummary};
use crate::resources::resolve_locator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub checks: Vec<CheckResult>,
    pub record: Option<RecordSummary>,
    pub stats: IndexStats,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|check| !check.passed)
    }
}

#[derive(Default)]
struct Checks(Vec<CheckResult>);

impl Checks {
    fn record(&mut self, name: &str, passed: bool) {
        if passed {
            info!("PASS {}", name);
        } else {
            warn!("FAIL {}", name);
        }
        self.0.push(CheckResult {
            name: name.to_string(),
            passed,
        });
    }
}

/// Insert one channel, rename it and verify every index along the way
pub fn run_scenario(
    demo: &DemoConfig,
    cache_config: &CacheConfig,
    image: ImageHandle,
) -> AppResult<ScenarioReport> {
    let locator = resolve_locator(&demo.url)?;
    let renamed = demo.renamed_to();
    let mut cache = TripleIndexCache::with_config(cache_config);
    let mut checks = Checks::default();

    checks.record(
        "insert succeeds",
        cache.insert(demo.name.as_str(), locator.clone(), image.clone())?,
    );

    let by_name = cache.query_by_name(&demo.name).map(|r| r.id());
    let by_image = cache.query_by_image(&image).map(|r| r.id());
    checks.record(
        "query by name and by image agree",
        by_name.is_some() && by_name == by_image,
    );
    checks.record(
        "record holds inserted name",
        cache
            .query_by_name(&demo.name)
            .is_some_and(|r| r.name() == demo.name),
    );
    checks.record(
        "record holds inserted locator",
        cache
            .query_by_name(&demo.name)
            .is_some_and(|r| *r.locator() == locator),
    );

    checks.record("rename succeeds", cache.rename(&demo.name, renamed.as_str())?);
    checks.record(
        "old name no longer resolves",
        cache.query_by_name(&demo.name).is_none(),
    );

    let renamed_id = cache.query_by_name(&renamed).map(|r| r.id());
    checks.record(
        "new name resolves to the same record",
        renamed_id.is_some() && renamed_id == by_image,
    );
    checks.record(
        "query by image sees new name",
        cache
            .query_by_image(&image)
            .is_some_and(|r| r.name() == renamed),
    );
    checks.record(
        "locator survives rename",
        cache
            .query_by_name(&renamed)
            .is_some_and(|r| *r.locator() == locator && *r.image() == image),
    );

    let stats = cache.stats();
    checks.record(
        "each index holds exactly one entry",
        stats.records == 1 && stats.is_compact(),
    );

    Ok(ScenarioReport {
        checks: checks.0,
        record: cache.query_by_name(&renamed).map(|r| r.summary()),
        stats,
    })
}
