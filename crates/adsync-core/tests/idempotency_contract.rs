//! Contract Test: Idempotent Import
//!
//! Running the same file against the same account must converge.
//!
//! Constraints verified:
//! - A second run creates nothing
//! - A fully populated account yields created = 0 and found = N
//! - Keywords already present under a different match type are skipped
//! - Broad-modified and plain keywords with the same words are one keyword
//!
//! If this test fails, repeated imports duplicate remote entities.

mod common;

use adsync_core::config::{Delimiter, EngineConfig, InputConfig, ListingStrategy};
use adsync_core::model::{AdGroup, Campaign, Keyword, MatchType};
use adsync_core::traits::AdDirectory;
use adsync_core::{SyncEngine, SyncPlan};
use common::*;

fn sample_plan() -> (tempfile::NamedTempFile, SyncPlan) {
    let file = csv_file(SAMPLE_CSV);
    let input = InputConfig::new(file.path(), Delimiter::SEMICOLON);
    let plan = SyncPlan::load(&input).expect("sample loads");
    (file, plan)
}

#[tokio::test]
async fn second_run_creates_nothing() {
    let (_file, plan) = sample_plan();
    let directory = RecordingDirectory::new();
    let (engine, _events) =
        SyncEngine::new(Box::new(directory.clone()), EngineConfig::default()).unwrap();

    let first = engine.run(&plan).await.unwrap();
    assert_eq!(first.total_created(), 9);

    let creates_after_first = directory.create_call_count();
    let second = engine.run(&plan).await.unwrap();

    assert_eq!(second.total_created(), 0);
    assert_eq!(
        directory.create_call_count(),
        creates_after_first,
        "second run must not call create"
    );
    assert_eq!(second.campaigns.found, 2);
    assert_eq!(second.ad_groups.found, 3);
    assert_eq!(second.keywords.found, 4);
}

#[tokio::test]
async fn second_run_creates_nothing_with_cached_listing() {
    let (_file, plan) = sample_plan();
    let directory = RecordingDirectory::new();
    let config = EngineConfig {
        listing: ListingStrategy::Cached,
        ..EngineConfig::default()
    };
    let (engine, _events) = SyncEngine::new(Box::new(directory.clone()), config).unwrap();

    engine.run(&plan).await.unwrap();
    let second = engine.run(&plan).await.unwrap();

    assert_eq!(second.total_created(), 0);
    assert_eq!(directory.account().keyword_count().await, 4);
}

#[tokio::test]
async fn populated_account_reports_found_only() {
    let (_file, plan) = sample_plan();

    // Populate through one engine, then import with a fresh one
    let account = adsync_core::MemoryDirectory::new();
    let (seed, _events) =
        SyncEngine::new(Box::new(account.clone()), EngineConfig::default()).unwrap();
    seed.run(&plan).await.unwrap();

    let directory = RecordingDirectory::over(account);
    let (engine, _events) =
        SyncEngine::new(Box::new(directory.clone()), EngineConfig::default()).unwrap();
    let report = engine.run(&plan).await.unwrap();

    assert_eq!(report.campaigns.created, 0);
    assert_eq!(report.ad_groups.created, 0);
    assert_eq!(report.keywords.created, 0);
    assert_eq!(report.campaigns.found, 2);
    assert_eq!(directory.create_call_count(), 0);
}

#[tokio::test]
async fn keyword_text_match_ignores_match_type() {
    // Existence is decided on text alone: an EXACT "red shoes" already in
    // the ad group hides a PHRASE "red shoes" from the file.
    let account = adsync_core::MemoryDirectory::new();
    let campaign = account.create_campaign(&Campaign::new("Shoes")).await.unwrap();
    let ad_group = account
        .create_ad_group(campaign.id, &AdGroup::new("Running", "Shoes"))
        .await
        .unwrap();
    account
        .create_keyword(
            ad_group.id,
            &Keyword::new("red shoes", MatchType::Exact, "Running"),
        )
        .await
        .unwrap();

    let plan = SyncPlan::new(
        vec![Campaign::new("Shoes")],
        vec![AdGroup::new("Running", "Shoes")],
        vec![Keyword::new("red shoes", MatchType::Phrase, "Running")],
    );

    let directory = RecordingDirectory::over(account);
    let (engine, _events) =
        SyncEngine::new(Box::new(directory.clone()), EngineConfig::default()).unwrap();
    let report = engine.run(&plan).await.unwrap();

    assert_eq!(report.keywords.created, 0);
    assert_eq!(directory.account().keyword_count().await, 1);
}

async fn import_bpe_and_exact_twins(listing: ListingStrategy) {
    let plan = SyncPlan::new(
        vec![Campaign::new("Shoes")],
        vec![AdGroup::new("Running", "Shoes")],
        vec![
            Keyword::new("red shoes", MatchType::Bpe, "Running"),
            Keyword::new("red shoes", MatchType::Exact, "Running"),
        ],
    );
    let directory = RecordingDirectory::new();
    let config = EngineConfig {
        listing,
        ..EngineConfig::default()
    };
    let (engine, _events) = SyncEngine::new(Box::new(directory.clone()), config).unwrap();

    let report = engine.run(&plan).await.unwrap();

    assert_eq!(report.keywords.created, 1, "{listing:?}");
    assert_eq!(report.keywords.found, 2, "{listing:?}");
    assert_eq!(directory.account().keyword_count().await, 1, "{listing:?}");
    assert_eq!(
        directory.created(),
        vec!["campaign:Shoes", "ad_group:Running", "keyword:red shoes"]
    );
}

#[tokio::test]
async fn broad_modified_keyword_hides_same_text_twin() {
    // "red shoes" is stored as "+red +shoes" for BPE; the EXACT row with
    // the same text still counts as present.
    import_bpe_and_exact_twins(ListingStrategy::Refetch).await;
    import_bpe_and_exact_twins(ListingStrategy::Cached).await;
}

#[tokio::test]
async fn existing_broad_modified_keyword_is_found_for_plain_row() {
    let account = adsync_core::MemoryDirectory::new();
    let campaign = account.create_campaign(&Campaign::new("Shoes")).await.unwrap();
    let ad_group = account
        .create_ad_group(campaign.id, &AdGroup::new("Running", "Shoes"))
        .await
        .unwrap();
    account
        .create_keyword(ad_group.id, &Keyword::new("red shoes", MatchType::Bpe, "Running"))
        .await
        .unwrap();

    let plan = SyncPlan::new(
        vec![Campaign::new("Shoes")],
        vec![AdGroup::new("Running", "Shoes")],
        vec![Keyword::new("red shoes", MatchType::Phrase, "Running")],
    );

    let directory = RecordingDirectory::over(account);
    let (engine, _events) =
        SyncEngine::new(Box::new(directory.clone()), EngineConfig::default()).unwrap();
    let report = engine.run(&plan).await.unwrap();

    assert_eq!(report.keywords.created, 0);
    assert_eq!(directory.create_call_count(), 0);
}
