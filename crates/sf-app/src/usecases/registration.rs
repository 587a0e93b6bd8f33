//! Drives one registration flow from the first step to a single submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, info_span, warn, Instrument};

use sf_core::api::{ApiError, ApiResponse};
use sf_core::ports::{ApiTransportExt, ApiTransportPort};
use sf_core::registration::{
    FlowContext, RegistrationFlow, StepError, StepOutcome, StepRecord, Stepper,
};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Step(#[from] StepError),
    #[error("a submission is already in progress")]
    InFlight,
    #[error("registration draft is missing a step")]
    Incomplete,
    #[error("failed to encode registration: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextOutcome {
    Advanced(usize),
    /// The server accepted the registration; the flow is finished.
    Submitted(ApiResponse),
}

/// Clears the in-flight flag however the submission ends, including when the
/// caller drops the future.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct RegistrationOrchestrator<F: RegistrationFlow> {
    api: Arc<dyn ApiTransportPort>,
    stepper: Mutex<Stepper<F>>,
    in_flight: AtomicBool,
}

impl<F: RegistrationFlow> RegistrationOrchestrator<F> {
    pub fn new(api: Arc<dyn ApiTransportPort>, ctx: FlowContext) -> Self {
        Self {
            api,
            stepper: Mutex::new(Stepper::new(ctx)),
            in_flight: AtomicBool::new(false),
        }
    }

    fn stepper(&self) -> MutexGuard<'_, Stepper<F>> {
        self.stepper
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current_step(&self) -> usize {
        self.stepper().current_step()
    }

    pub fn current_record(&self) -> StepRecord {
        self.stepper().current_record()
    }

    pub fn completed_steps(&self) -> Vec<usize> {
        self.stepper().completed_steps().iter().copied().collect()
    }

    pub fn draft(&self) -> F::Draft {
        self.stepper().draft().clone()
    }

    pub fn is_submitted(&self) -> bool {
        self.stepper().is_submitted()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validate and merge `input`; on the last step, submit the draft once.
    ///
    /// A failed submission leaves the flow on its last step with the draft
    /// intact, so the same input can be sent again.
    pub async fn next(&self, input: F::Input) -> Result<NextOutcome, SubmitError> {
        // The flag is read and raised under the stepper lock, so input sent
        // during a submission is refused before it reaches the draft.
        let (body, _guard) = {
            let mut stepper = self.stepper();
            if self.is_submitting() {
                return Err(SubmitError::InFlight);
            }
            match stepper.go_next(input)? {
                StepOutcome::Advanced(step) => return Ok(NextOutcome::Advanced(step)),
                StepOutcome::ReadyToSubmit => {
                    let payload = stepper.payload().ok_or(SubmitError::Incomplete)?;
                    let body = serde_json::to_value(&payload)?;
                    self.in_flight.store(true, Ordering::SeqCst);
                    (body, InFlightGuard(&self.in_flight))
                }
            }
        };

        let span = info_span!("usecase.registration.submit", flow = F::NAME);
        async {
            match self.api.post(F::submission_path(), &body).await {
                Ok(response) => {
                    self.stepper().mark_submitted();
                    info!(status = response.status, "Registration submitted");
                    Ok(NextOutcome::Submitted(response))
                }
                Err(err) => {
                    warn!(error = %err, "Registration submission failed");
                    Err(SubmitError::Api(err))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Ignored while a submission is in flight.
    pub fn back(&self) -> usize {
        let mut stepper = self.stepper();
        if self.is_submitting() {
            return stepper.current_step();
        }
        stepper.go_back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedApi;
    use chrono::NaiveDate;
    use serde_json::json;
    use sf_core::catalog::{Gender, OTHER_INSTITUTE};
    use sf_core::ports::HttpMethod;
    use sf_core::registration::flows::{QuickInput, QuickPersonal, QuickSportFlow};
    use sf_core::registration::records::{
        DocumentUploads, EmergencyContact, GuardianDetails, InstitutionAffiliation, MedicalInfo,
        ParentMedical, ParticipationType, PaymentMethod, PersonalDetails, ReviewConfirmation, SportChoice,
        SportsSelection,
    };
    use sf_core::registration::FeeSchedule;

    fn ctx() -> FlowContext {
        FlowContext::new(
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            FeeSchedule::default(),
        )
    }

    /// Holds every request until the gate is opened.
    struct GatedApi {
        gate: Arc<tokio::sync::Notify>,
    }

    #[async_trait::async_trait]
    impl ApiTransportPort for GatedApi {
        async fn request(
            &self,
            _method: HttpMethod,
            _path: &str,
            _body: Option<serde_json::Value>,
        ) -> Result<ApiResponse, ApiError> {
            self.gate.notified().await;
            Ok(ApiResponse::new(201, json!({"id": "reg-gated"})))
        }
    }

    fn inputs() -> Vec<QuickInput> {
        vec![
            QuickInput::Personal(QuickPersonal {
                personal: PersonalDetails {
                    first_name: "Asha".into(),
                    middle_name: None,
                    last_name: "Rao".into(),
                    gender: Some(Gender::Female),
                    date_of_birth: NaiveDate::from_ymd_opt(2008, 5, 1),
                    email: "asha@example.com".into(),
                    phone: "+91 98450 12345".into(),
                },
                affiliation: InstitutionAffiliation {
                    institute: OTHER_INSTITUTE.into(),
                    institution_name: Some("Hillside Academy".into()),
                    student_id: "HS-042".into(),
                },
            }),
            QuickInput::Documents(DocumentUploads {
                student_id_image: Some("id.png".into()),
                age_proof_image: Some("birth.pdf".into()),
                profile_picture: None,
            }),
            QuickInput::ParentMedical(ParentMedical {
                guardian: GuardianDetails {
                    parent_guardian_name: "Kiran Rao".into(),
                    parent_phone: "+91 98450 54321".into(),
                    parent_email: None,
                },
                emergency: EmergencyContact {
                    name: "Lata Rao".into(),
                    relation: "Mother".into(),
                    phone: "+91 98450 11111".into(),
                    email: None,
                },
                medical: MedicalInfo {
                    medical_question_1: Some("No".into()),
                    medical_question_2: Some("No".into()),
                    has_allergies: false,
                    allergies_details: None,
                },
            }),
            QuickInput::Sports(SportsSelection {
                participation_type: ParticipationType::Both,
                sports: vec![SportChoice::new("Football"), SportChoice::new("Chess")],
            }),
            QuickInput::Review(ReviewConfirmation {
                accept_terms: true,
                payment_method: Some(PaymentMethod::Upi),
            }),
        ]
    }

    async fn walk_to_review(flow: &RegistrationOrchestrator<QuickSportFlow>) -> QuickInput {
        let mut inputs = inputs();
        let review = inputs.pop().unwrap();
        for input in inputs {
            assert!(matches!(flow.next(input).await.unwrap(), NextOutcome::Advanced(_)));
        }
        review
    }

    #[tokio::test]
    async fn final_step_submits_once_with_full_payload() {
        let api = ScriptedApi::new();
        api.ok(HttpMethod::Post, "registrations", json!({"id": "reg-1", "status": "pending"}));
        let flow = RegistrationOrchestrator::<QuickSportFlow>::new(api.clone(), ctx());

        let review = walk_to_review(&flow).await;
        assert_eq!(flow.current_step(), 5);
        let outcome = flow.next(review.clone()).await.unwrap();

        let NextOutcome::Submitted(response) = outcome else {
            panic!("expected submission");
        };
        assert_eq!(response.body["id"], json!("reg-1"));
        assert!(flow.is_submitted());
        assert_eq!(api.calls_to("registrations"), 1);

        let body = api.calls()[0].body.clone().unwrap();
        assert_eq!(body["fees"]["total"], json!(100_00));
        assert_eq!(body["institution_name"], json!("Hillside Academy"));

        let again = flow.next(review).await.unwrap_err();
        assert!(matches!(again, SubmitError::Step(StepError::AlreadySubmitted)));
        assert_eq!(api.calls_to("registrations"), 1);
    }

    #[tokio::test]
    async fn failed_submission_keeps_draft_on_last_step() {
        let api = ScriptedApi::new();
        api.fail(HttpMethod::Post, "registrations", 422, json!({"detail": "Email already registered"}));
        api.ok(HttpMethod::Post, "registrations", json!({"id": "reg-2"}));
        let flow = RegistrationOrchestrator::<QuickSportFlow>::new(api.clone(), ctx());

        let review = walk_to_review(&flow).await;
        let draft_before = flow.draft();

        let err = flow.next(review.clone()).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(flow.current_step(), 5);
        assert!(!flow.is_submitted());
        assert!(!flow.is_submitting());
        assert_eq!(flow.draft().personal, draft_before.personal);

        assert!(matches!(flow.next(review).await.unwrap(), NextOutcome::Submitted(_)));
        assert_eq!(api.calls_to("registrations"), 2);
    }

    #[tokio::test]
    async fn going_back_from_review_and_resubmitting_uses_the_edited_draft() {
        let api = ScriptedApi::new();
        api.ok(HttpMethod::Post, "registrations", json!({"id": "reg-3"}));
        let flow = RegistrationOrchestrator::<QuickSportFlow>::new(api.clone(), ctx());

        let review = walk_to_review(&flow).await;
        assert_eq!(flow.back(), 4);
        assert!(api.calls().is_empty());

        let one_sport = QuickInput::Sports(SportsSelection {
            participation_type: ParticipationType::Individual,
            sports: vec![SportChoice::new("Chess")],
        });
        assert_eq!(flow.next(one_sport).await.unwrap(), NextOutcome::Advanced(5));
        assert!(matches!(flow.next(review).await.unwrap(), NextOutcome::Submitted(_)));

        assert_eq!(api.calls_to("registrations"), 1);
        let body = api.calls()[0].body.clone().unwrap();
        assert_eq!(body["fees"]["total"], json!(75_00));
    }

    #[tokio::test]
    async fn input_sent_during_submission_does_not_touch_the_draft() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let api = Arc::new(GatedApi { gate: gate.clone() });
        let flow = RegistrationOrchestrator::<QuickSportFlow>::new(api, ctx());
        let review = walk_to_review(&flow).await;

        let late_review = QuickInput::Review(ReviewConfirmation {
            accept_terms: true,
            payment_method: Some(PaymentMethod::Card),
        });

        let first = flow.next(review);
        let second = async {
            while !flow.is_submitting() {
                tokio::task::yield_now().await;
            }
            let outcome = flow.next(late_review).await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(second, Err(SubmitError::InFlight)));
        assert!(matches!(first.unwrap(), NextOutcome::Submitted(_)));
        assert_eq!(
            flow.draft().review.and_then(|review| review.payment_method),
            Some(PaymentMethod::Upi)
        );
    }

    #[tokio::test]
    async fn validation_errors_never_touch_the_network() {
        let api = ScriptedApi::new();
        let flow = RegistrationOrchestrator::<QuickSportFlow>::new(api.clone(), ctx());

        let err = flow
            .next(QuickInput::Personal(QuickPersonal::default()))
            .await
            .unwrap_err();

        let SubmitError::Step(step_error) = err else {
            panic!("expected a step error");
        };
        assert!(step_error.field_errors().len() > 1);
        assert!(api.calls().is_empty());
        assert_eq!(flow.current_step(), 1);
    }

    #[tokio::test]
    async fn second_submission_while_in_flight_is_rejected() {
        let api = ScriptedApi::new();
        let flow = RegistrationOrchestrator::<QuickSportFlow>::new(api, ctx());
        let review = walk_to_review(&flow).await;

        flow.in_flight.store(true, Ordering::SeqCst);
        assert!(matches!(flow.next(review).await, Err(SubmitError::InFlight)));
        assert_eq!(flow.back(), 5, "back is ignored while submitting");

        flow.in_flight.store(false, Ordering::SeqCst);
        assert_eq!(flow.back(), 4);
        assert_eq!(flow.completed_steps(), vec![1, 2, 3, 4]);
    }
}
