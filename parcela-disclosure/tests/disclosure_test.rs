//! Disclosure policy tests: free teaser, credit-gated reveal,
//! idempotency, and the concurrent single-credit race.

use std::sync::Arc;

use parcela_core::config::DisclosureConfig;
use parcela_core::errors::DisclosureError;
use parcela_core::models::{
    CallerId, CandidateDetail, GenerationId, RankedOutcome, RankedResult, SessionId,
    SourceBreakdown,
};
use parcela_core::parcel::{
    BuildStatus, Centroid, CompositeScores, LocationId, OwnershipType, Parcel, ParcelId,
    SizeClass,
};
use parcela_core::traits::CreditLedger;
use parcela_disclosure::{DisclosurePolicy, InMemoryCreditLedger};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parcel(id: u64, area_m2: f64) -> Parcel {
    Parcel {
        id: ParcelId(id),
        area_m2,
        centroid: Centroid { lat: 54.42, lon: 18.47 },
        ownership: OwnershipType::Private,
        build_status: BuildStatus::Vacant,
        size_class: SizeClass::Medium,
        zoning: None,
        district: LocationId(10),
        scores: CompositeScores::default(),
    }
}

fn ranked(id: u64, proximity: f64) -> RankedResult {
    RankedResult {
        parcel: ParcelId(id),
        score: proximity,
        breakdown: SourceBreakdown {
            graph: true,
            proximity,
            semantic: 0.0,
            structural: 0.0,
        },
        highlights: vec!["close to forest (proximity score 0.90)".into()],
        summary: "Ranked mainly by proximity fit".into(),
    }
}

fn outcome(ids: &[(u64, f64)]) -> RankedOutcome {
    let results: Vec<RankedResult> = ids.iter().map(|(id, p)| ranked(*id, *p)).collect();
    let page: Vec<CandidateDetail> = ids
        .iter()
        .map(|(id, p)| CandidateDetail {
            parcel: parcel(*id, 1_800.0),
            district_name: "Osowa".into(),
            result: ranked(*id, *p),
        })
        .collect();
    RankedOutcome {
        request_id: Uuid::new_v4(),
        generation: GenerationId("gen-test".into()),
        total_count: results.len(),
        results,
        page,
        degraded: false,
        skipped_branches: Vec::new(),
        by_sibling_scope: Vec::new(),
    }
}

fn policy_with_credits(caller: &CallerId, credits: u32) -> (DisclosurePolicy, Arc<InMemoryCreditLedger>) {
    let ledger = Arc::new(InMemoryCreditLedger::new());
    ledger.set_balance(caller, credits);
    (
        DisclosurePolicy::new(ledger.clone(), DisclosureConfig::default()),
        ledger,
    )
}

// ---------------------------------------------------------------------------
// Free tier
// ---------------------------------------------------------------------------

#[test]
fn count_and_teaser_are_free_at_zero_balance() {
    let caller = CallerId("broke-buyer".into());
    let (policy, _) = policy_with_credits(&caller, 0);
    let outcome = outcome(&[(102, 0.9), (101, 0.55)]);

    let response = policy.respond(&outcome);
    assert_eq!(response.total_count, 2);
    assert_eq!(response.teaser.len(), 2);
    assert_eq!(response.teaser[0].approx_location, "Osowa");
    assert!(response.teaser[0].area_class.contains("medium"));
}

#[test]
fn teaser_is_bounded_by_config() {
    let caller = CallerId("buyer".into());
    let (policy, _) = policy_with_credits(&caller, 0);
    let outcome = outcome(&[(1, 0.9), (2, 0.8), (3, 0.7), (4, 0.6), (5, 0.5)]);

    let response = policy.respond(&outcome);
    assert_eq!(response.teaser.len(), DisclosureConfig::default().teaser_size);
    // The full ranked page still lists every id for reveal targeting.
    assert_eq!(response.ranked_page.len(), 5);
}

// ---------------------------------------------------------------------------
// Scenario C: zero-credit reveal
// ---------------------------------------------------------------------------

#[test]
fn scenario_c_zero_credits_reveal_fails_with_prompt() {
    let caller = CallerId("broke-buyer".into());
    let (policy, ledger) = policy_with_credits(&caller, 0);
    let outcome = outcome(&[(102, 0.9), (101, 0.55)]);
    let session = SessionId::new();

    let err = policy
        .reveal(&caller, session, &outcome, ParcelId(102), parcel(102, 1_800.0))
        .expect_err("should refuse");
    match err {
        DisclosureError::InsufficientCredits { prompt } => {
            assert_eq!(prompt.caller, "broke-buyer");
            assert_eq!(prompt.required_credits, 1);
            assert_eq!(prompt.suggested_topup, 10);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ledger.balance(&caller), 0);

    // The same query's count and teaser still work.
    let response = policy.respond(&outcome);
    assert_eq!(response.total_count, 2);
    assert!(!response.teaser.is_empty());
}

// ---------------------------------------------------------------------------
// Idempotent reveal
// ---------------------------------------------------------------------------

#[test]
fn revealing_twice_consumes_exactly_one_credit() {
    let caller = CallerId("buyer".into());
    let (policy, ledger) = policy_with_credits(&caller, 5);
    let outcome = outcome(&[(102, 0.9)]);
    let session = SessionId::new();

    let first = policy
        .reveal(&caller, session, &outcome, ParcelId(102), parcel(102, 1_800.0))
        .expect("first reveal");
    assert!(first.charged);

    let second = policy
        .reveal(&caller, session, &outcome, ParcelId(102), parcel(102, 1_800.0))
        .expect("second reveal");
    assert!(!second.charged);

    assert_eq!(ledger.balance(&caller), 4);
}

#[test]
fn re_reveal_in_a_new_session_charges_again() {
    let caller = CallerId("buyer".into());
    let (policy, ledger) = policy_with_credits(&caller, 5);
    let outcome = outcome(&[(102, 0.9)]);

    policy
        .reveal(&caller, SessionId::new(), &outcome, ParcelId(102), parcel(102, 1_800.0))
        .expect("session one");
    policy
        .reveal(&caller, SessionId::new(), &outcome, ParcelId(102), parcel(102, 1_800.0))
        .expect("session two");
    assert_eq!(ledger.balance(&caller), 3);
}

#[test]
fn any_ranked_id_is_revealable_but_unranked_ids_are_not() {
    let caller = CallerId("buyer".into());
    let (policy, _) = policy_with_credits(&caller, 5);
    let outcome = outcome(&[(102, 0.9), (101, 0.55)]);
    let session = SessionId::new();

    // Not the teaser top entry, still revealable.
    let revealed = policy
        .reveal(&caller, session, &outcome, ParcelId(101), parcel(101, 600.0))
        .expect("reveal non-top entry");
    assert_eq!(revealed.parcel.id, ParcelId(101));

    let err = policy
        .reveal(&caller, session, &outcome, ParcelId(999), parcel(999, 100.0))
        .expect_err("unranked id");
    assert!(matches!(err, DisclosureError::UnknownParcel(ParcelId(999))));
}

// ---------------------------------------------------------------------------
// Scenario D: concurrent reveals with one credit
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scenario_d_one_credit_two_concurrent_reveals() {
    for _ in 0..50 {
        let caller = CallerId("racer".into());
        let ledger = Arc::new(InMemoryCreditLedger::new());
        ledger.set_balance(&caller, 1);
        let policy = Arc::new(DisclosurePolicy::new(
            ledger.clone(),
            DisclosureConfig::default(),
        ));
        let outcome = Arc::new(outcome(&[(101, 0.5), (102, 0.9)]));
        let session = SessionId::new();

        let mut tasks = Vec::new();
        for id in [101u64, 102] {
            let policy = policy.clone();
            let caller = caller.clone();
            let outcome = outcome.clone();
            tasks.push(tokio::spawn(async move {
                policy.reveal(&caller, session, &outcome, ParcelId(id), parcel(id, 1_000.0))
            }));
        }

        let mut successes = 0;
        let mut refusals = 0;
        for task in tasks {
            match task.await.expect("join") {
                Ok(revealed) => {
                    assert!(revealed.charged);
                    successes += 1;
                }
                Err(DisclosureError::InsufficientCredits { .. }) => refusals += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1, "exactly one reveal may charge");
        assert_eq!(refusals, 1);
        assert_eq!(ledger.balance(&caller), 0);
    }
}
