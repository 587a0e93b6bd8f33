//! Process-wide admin record store.
//!
//! State sits behind one mutex and is only mutated through the store's own
//! methods. Listeners are invoked after the state lock is released, in
//! subscription order, with no payload; they re-read what they need.
//!
//! A listener may call a mutating method while being notified. The nested
//! mutation is applied immediately and its notification is queued: once the
//! current round finishes, every listener is called again. Notification never
//! recurses.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::NaiveDate;

use super::model::{
    Institution, PaymentStatus, RequestStatus, SponsorData, SponsorshipRequest,
};
use super::stats::DashboardStats;
use crate::ids::{InstitutionId, SponsorshipRequestId};
use crate::ports::ClockPort;

pub type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSnapshot {
    pub institutions: Vec<Institution>,
    pub sponsorship_requests: Vec<SponsorshipRequest>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.entries).push((id, listener));
        id
    }

    fn remove(&self, id: u64) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    fn snapshot(&self) -> Vec<Listener> {
        lock(&self.entries)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    fn len(&self) -> usize {
        lock(&self.entries).len()
    }
}

/// Handle returned by [`AdminDataStore::subscribe`].
///
/// Dropping it keeps the listener registered; call [`Subscription::unsubscribe`].
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Returns `false` when the listener was already removed.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.remove(self.id))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

pub struct AdminDataStore {
    state: Mutex<AdminSnapshot>,
    listeners: Arc<ListenerRegistry>,
    dispatching: AtomicBool,
    pending: AtomicBool,
    clock: Arc<dyn ClockPort>,
}

impl AdminDataStore {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self::with_records(clock, Vec::new(), Vec::new())
    }

    pub fn with_records(
        clock: Arc<dyn ClockPort>,
        institutions: Vec<Institution>,
        sponsorship_requests: Vec<SponsorshipRequest>,
    ) -> Self {
        Self {
            state: Mutex::new(AdminSnapshot {
                institutions,
                sponsorship_requests,
            }),
            listeners: Arc::new(ListenerRegistry::default()),
            dispatching: AtomicBool::new(false),
            pending: AtomicBool::new(false),
            clock,
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.listeners.add(Arc::new(listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn snapshot(&self) -> AdminSnapshot {
        lock(&self.state).clone()
    }

    pub fn institutions(&self) -> Vec<Institution> {
        lock(&self.state).institutions.clone()
    }

    pub fn sponsorship_requests(&self) -> Vec<SponsorshipRequest> {
        lock(&self.state).sponsorship_requests.clone()
    }

    pub fn institution(&self, id: InstitutionId) -> Option<Institution> {
        lock(&self.state)
            .institutions
            .iter()
            .find(|institution| institution.id == id)
            .cloned()
    }

    /// Most recent request pointing at `institution_id`.
    pub fn latest_request_for(&self, institution_id: InstitutionId) -> Option<SponsorshipRequest> {
        lock(&self.state)
            .sponsorship_requests
            .iter()
            .rev()
            .find(|request| request.institution_id == institution_id)
            .cloned()
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        let state = lock(&self.state);
        DashboardStats::compute(&state.institutions, &state.sponsorship_requests)
    }

    /// Swap in freshly loaded records and notify.
    pub fn replace_all(
        &self,
        institutions: Vec<Institution>,
        sponsorship_requests: Vec<SponsorshipRequest>,
    ) {
        {
            let mut state = lock(&self.state);
            state.institutions = institutions;
            state.sponsorship_requests = sponsorship_requests;
        }
        self.notify();
    }

    /// Record a sponsorship decision for an institution.
    ///
    /// The institution with `institution_id` and its most recent sponsorship
    /// request are updated; a missing record is skipped without error. An
    /// approval carrying sponsor data also forces the institution to fully
    /// paid. Rejecting later does not undo that.
    pub fn update_sponsorship_status(
        &self,
        institution_id: InstitutionId,
        status: RequestStatus,
        sponsor: Option<SponsorData>,
    ) {
        let today = self.clock.today();
        {
            let mut state = lock(&self.state);
            let approved_with = sponsor.filter(|_| status == RequestStatus::Approved);

            if let Some(institution) = state
                .institutions
                .iter_mut()
                .find(|institution| institution.id == institution_id)
            {
                apply_to_institution(institution, status, approved_with.as_ref(), today);
            }

            if let Some(request) = state
                .sponsorship_requests
                .iter_mut()
                .rev()
                .find(|request| request.institution_id == institution_id)
            {
                apply_to_request(request, status, approved_with.as_ref());
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%institution_id, ?status, "sponsorship status updated");
        self.notify();
    }

    /// Record a decision on one specific request and on the institution it
    /// points at. Other requests of that institution are left as they are.
    /// An unknown request id changes nothing.
    pub fn update_sponsorship_request(
        &self,
        request_id: SponsorshipRequestId,
        status: RequestStatus,
        sponsor: Option<SponsorData>,
    ) {
        let today = self.clock.today();
        {
            let mut state = lock(&self.state);
            let approved_with = sponsor.filter(|_| status == RequestStatus::Approved);

            let institution_id = state
                .sponsorship_requests
                .iter_mut()
                .find(|request| request.id == request_id)
                .map(|request| {
                    apply_to_request(request, status, approved_with.as_ref());
                    request.institution_id
                });

            if let Some(institution_id) = institution_id {
                if let Some(institution) = state
                    .institutions
                    .iter_mut()
                    .find(|institution| institution.id == institution_id)
                {
                    apply_to_institution(institution, status, approved_with.as_ref(), today);
                }
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%request_id, ?status, "sponsorship request updated");
        self.notify();
    }

    /// Overwrite an institution's payment fields. Unknown ids are ignored.
    pub fn update_payment_status(
        &self,
        institution_id: InstitutionId,
        status: PaymentStatus,
        paid_amount: u64,
    ) {
        let today = self.clock.today();
        {
            let mut state = lock(&self.state);
            if let Some(institution) = state
                .institutions
                .iter_mut()
                .find(|institution| institution.id == institution_id)
            {
                institution.payment_status = status;
                institution.paid_amount = paid_amount;
                institution.last_payment = Some(today);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%institution_id, ?status, paid_amount, "payment status updated");
        self.notify();
    }

    fn notify(&self) {
        self.pending.store(true, Ordering::SeqCst);
        if self.dispatching.swap(true, Ordering::SeqCst) {
            // A round is already running on this or another call stack; it
            // will pick up the pending flag.
            return;
        }
        loop {
            while self.pending.swap(false, Ordering::SeqCst) {
                for listener in self.listeners.snapshot() {
                    listener();
                }
            }
            self.dispatching.store(false, Ordering::SeqCst);
            if !self.pending.load(Ordering::SeqCst) || self.dispatching.swap(true, Ordering::SeqCst)
            {
                break;
            }
        }
    }
}

fn apply_to_institution(
    institution: &mut Institution,
    status: RequestStatus,
    approved_with: Option<&SponsorData>,
    today: NaiveDate,
) {
    institution.sponsorship_status = status.as_sponsorship_status();
    if let Some(data) = approved_with {
        institution.sponsor_name = Some(data.sponsor_name.clone());
        institution.sponsored_amount = Some(data.sponsored_amount);
        institution.payment_status = PaymentStatus::Paid;
        institution.paid_amount = institution.total_amount;
        institution.last_payment = Some(today);
    }
}

fn apply_to_request(
    request: &mut SponsorshipRequest,
    status: RequestStatus,
    approved_with: Option<&SponsorData>,
) {
    request.status = status;
    if let Some(data) = approved_with {
        request.sponsor_name = Some(data.sponsor_name.clone());
        request.sponsored_amount = Some(data.sponsored_amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::model::{SponsorshipStatus, SponsorshipType};
    use crate::ids::SponsorshipRequestId;
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;

    struct FixedClock;

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            // 2026-10-16T12:00:00Z
            1_792_152_000_000
        }
    }

    fn institution(id: u64, total: u64, paid: u64) -> Institution {
        Institution {
            id: InstitutionId::new(id),
            name: format!("Institution {id}"),
            contact_person: "Lee Park".into(),
            email: format!("admin{id}@example.edu"),
            phone: String::new(),
            payment_status: if paid == 0 {
                PaymentStatus::Pending
            } else {
                PaymentStatus::Partial
            },
            total_amount: total,
            paid_amount: paid,
            last_payment: None,
            sponsorship_status: SponsorshipStatus::Applied,
            sponsor_name: None,
            sponsored_amount: None,
            sports: vec!["Football".into()],
        }
    }

    fn request(id: u64, institution_id: u64) -> SponsorshipRequest {
        SponsorshipRequest {
            id: SponsorshipRequestId::new(id),
            institution_id: InstitutionId::new(institution_id),
            institution_name: format!("Institution {institution_id}"),
            sponsorship_type: SponsorshipType::Full,
            status: RequestStatus::Pending,
            requested_amount: 500_00,
            sponsored_amount: None,
            sponsor_name: None,
            reason: "Travel costs".into(),
            submitted_on: None,
        }
    }

    fn sponsor() -> SponsorData {
        SponsorData {
            sponsor_name: "ABC Sports Company".into(),
            sponsored_amount: 500_00,
        }
    }

    fn store() -> AdminDataStore {
        AdminDataStore::with_records(
            Arc::new(FixedClock),
            vec![institution(1, 500_00, 100_00), institution(2, 300_00, 0)],
            vec![request(10, 1), request(11, 2)],
        )
    }

    fn counter(store: &AdminDataStore) -> (Arc<AtomicUsize>, Subscription) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscription = store.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (calls, subscription)
    }

    #[test]
    fn approval_with_sponsor_forces_full_payment() {
        let store = store();
        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Approved, Some(sponsor()));

        let inst = store.institution(InstitutionId::new(1)).unwrap();
        assert_eq!(inst.payment_status, PaymentStatus::Paid);
        assert_eq!(inst.paid_amount, inst.total_amount);
        assert_eq!(inst.sponsorship_status, SponsorshipStatus::Approved);
        assert_eq!(inst.sponsor_name.as_deref(), Some("ABC Sports Company"));
        assert_eq!(inst.last_payment, NaiveDate::from_ymd_opt(2026, 10, 16));

        let req = &store.sponsorship_requests()[0];
        assert_eq!(req.status, RequestStatus::Approved);
        assert_eq!(req.sponsored_amount, Some(500_00));
    }

    #[test]
    fn approval_without_sponsor_data_leaves_payment_alone() {
        let store = store();
        store.update_sponsorship_status(InstitutionId::new(2), RequestStatus::Approved, None);

        let inst = store.institution(InstitutionId::new(2)).unwrap();
        assert_eq!(inst.sponsorship_status, SponsorshipStatus::Approved);
        assert_eq!(inst.payment_status, PaymentStatus::Pending);
        assert_eq!(inst.paid_amount, 0);
    }

    #[test]
    fn approving_twice_is_idempotent() {
        let store = store();
        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Approved, Some(sponsor()));
        let once = store.snapshot();
        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Approved, Some(sponsor()));
        assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn later_rejection_does_not_undo_payment() {
        let store = store();
        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Approved, Some(sponsor()));
        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Rejected, Some(sponsor()));

        let inst = store.institution(InstitutionId::new(1)).unwrap();
        assert_eq!(inst.sponsorship_status, SponsorshipStatus::Rejected);
        assert_eq!(inst.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn unknown_id_is_a_silent_no_op_that_still_notifies() {
        let store = store();
        let before = store.snapshot();
        let (calls, _sub) = counter(&store);

        store.update_sponsorship_status(InstitutionId::new(9999), RequestStatus::Approved, Some(sponsor()));

        assert_eq!(store.snapshot(), before);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn request_without_institution_is_still_updated() {
        let store = AdminDataStore::with_records(Arc::new(FixedClock), vec![], vec![request(10, 1)]);
        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Rejected, None);
        assert_eq!(store.sponsorship_requests()[0].status, RequestStatus::Rejected);
    }

    #[test]
    fn latest_request_is_the_last_one_loaded() {
        let store = AdminDataStore::with_records(
            Arc::new(FixedClock),
            vec![institution(1, 500_00, 0)],
            vec![request(10, 1), request(11, 2), request(12, 1)],
        );
        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Rejected, None);

        let latest = store.latest_request_for(InstitutionId::new(1)).unwrap();
        assert_eq!(latest.id, SponsorshipRequestId::new(12));
        assert_eq!(latest.status, RequestStatus::Rejected);
        assert_eq!(store.sponsorship_requests()[0].status, RequestStatus::Pending);
        assert!(store.latest_request_for(InstitutionId::new(3)).is_none());
    }

    #[test]
    fn decision_on_one_request_leaves_siblings_alone() {
        let store = AdminDataStore::with_records(
            Arc::new(FixedClock),
            vec![institution(4, 800_00, 0)],
            vec![request(21, 4), request(22, 4)],
        );
        let (calls, _sub) = counter(&store);

        store.update_sponsorship_request(
            SponsorshipRequestId::new(21),
            RequestStatus::Approved,
            Some(sponsor()),
        );

        let requests = store.sponsorship_requests();
        assert_eq!(requests[0].id, SponsorshipRequestId::new(21));
        assert_eq!(requests[0].status, RequestStatus::Approved);
        assert_eq!(requests[0].sponsor_name.as_deref(), Some("ABC Sports Company"));
        assert_eq!(requests[1].status, RequestStatus::Pending);
        assert_eq!(requests[1].sponsor_name, None);

        let inst = store.institution(InstitutionId::new(4)).unwrap();
        assert_eq!(inst.sponsorship_status, SponsorshipStatus::Approved);
        assert_eq!(inst.payment_status, PaymentStatus::Paid);
        assert_eq!(inst.paid_amount, 800_00);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_request_id_changes_nothing() {
        let store = store();
        let before = store.snapshot();

        store.update_sponsorship_request(
            SponsorshipRequestId::new(9999),
            RequestStatus::Approved,
            Some(sponsor()),
        );

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let store = store();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            store.subscribe(move || order.lock().unwrap().push(tag));
        }

        store.update_payment_status(InstitutionId::new(2), PaymentStatus::Partial, 100_00);

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let store = store();
        let (calls, sub) = counter(&store);
        let (other_calls, _other) = counter(&store);

        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        store.update_payment_status(InstitutionId::new(1), PaymentStatus::Paid, 500_00);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(other_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn subscriptions_from_same_caller_are_independent() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let a = {
            let calls = Arc::clone(&calls);
            store.subscribe(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _b = {
            let calls = Arc::clone(&calls);
            store.subscribe(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        a.unsubscribe();
        store.update_payment_status(InstitutionId::new(1), PaymentStatus::Paid, 500_00);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nested_mutation_from_listener_is_queued_not_recursive() {
        let store = Arc::new(store());
        let depth = Arc::new(AtomicUsize::new(0));
        let max_depth = Arc::new(AtomicUsize::new(0));
        let rounds = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&store);
        let (d, m, r) = (Arc::clone(&depth), Arc::clone(&max_depth), Arc::clone(&rounds));
        store.subscribe(move || {
            let now = d.fetch_add(1, Ordering::SeqCst) + 1;
            m.fetch_max(now, Ordering::SeqCst);
            if r.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(store) = weak.upgrade() {
                    store.update_payment_status(InstitutionId::new(2), PaymentStatus::Paid, 300_00);
                    // Applied immediately, before this listener returns.
                    assert_eq!(
                        store.institution(InstitutionId::new(2)).unwrap().payment_status,
                        PaymentStatus::Paid
                    );
                }
            }
            d.fetch_sub(1, Ordering::SeqCst);
        });

        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Approved, Some(sponsor()));

        assert_eq!(rounds.load(Ordering::SeqCst), 2, "queued round delivered");
        assert_eq!(max_depth.load(Ordering::SeqCst), 1, "never re-entered");
    }

    #[test]
    fn dashboard_stats_follow_mutations() {
        let store = store();
        let stats = store.dashboard_stats();
        assert_eq!(stats.total_institutions, 2);
        assert_eq!(stats.partial, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.collected, 100_00);
        assert_eq!(stats.outstanding, 700_00);
        assert_eq!(stats.pending_requests, 2);

        store.update_sponsorship_status(InstitutionId::new(1), RequestStatus::Approved, Some(sponsor()));
        let stats = store.dashboard_stats();
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.collected, 500_00);
        assert_eq!(stats.approved_requests, 1);
        assert_eq!(stats.sponsored_total, 500_00);
    }

    #[test]
    fn replace_all_swaps_records_and_notifies() {
        let store = AdminDataStore::new(Arc::new(FixedClock));
        let (calls, _sub) = counter(&store);

        store.replace_all(vec![institution(5, 100_00, 0)], vec![]);

        assert_eq!(store.institutions().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
