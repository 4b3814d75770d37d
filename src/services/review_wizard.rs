// src/services/review_wizard.rs
// DOCUMENTATION: Multi-step review wizard state machine
// PURPOSE: Accumulate a review draft across three steps with per-step gates

use crate::errors::GymsError;
use crate::services::kakao_client::KakaoPlace;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text comment cap, in characters
pub const COMMENT_MAX_CHARS: usize = 500;

/// Holiday label meaning "no regular closing day"
/// Mutually exclusive with the weekday labels
pub const HOLIDAY_NONE: &str = "없음";

/// Selectable weekday labels
pub const WEEKDAY_LABELS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// Wizard steps, in order
/// DOCUMENTATION: Linear forward path, free backward navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectGym,
    BasicInfo,
    DetailedInfo,
    Submitted,
}

/// The gym a review is being written for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectedGym {
    /// An existing store record
    Registered { gym_id: Uuid },
    /// A live provider document; the gym record is created on submit
    External { place: KakaoPlace },
}

/// Reviewer's overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommend,
    NotRecommend,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Recommend => "recommend",
            Recommendation::NotRecommend => "not_recommend",
        }
    }

    /// Star rating recorded for a wizard submission
    pub fn derived_rating(&self) -> i32 {
        match self {
            Recommendation::Recommend => 5,
            Recommendation::NotRecommend => 1,
        }
    }
}

/// In-progress review data
/// DOCUMENTATION: Lives only for the wizard session; nothing is written to
/// the store before submit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub selected_gym: Option<SelectedGym>,
    pub photos: Vec<String>,
    pub daily_price: Option<i32>,
    pub regular_holidays: Vec<String>,
    pub power_rack_count: Option<i32>,
    pub smith_rack_count: Option<i32>,
    pub dumbbell_max_weight: Option<i32>,
    pub machine_brands: Vec<String>,
    pub amenities: Vec<String>,
    pub comment: Option<String>,
    pub recommendation: Option<Recommendation>,
}

/// Finalized submission payload produced by the wizard
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    pub selected_gym: SelectedGym,
    pub user_id: Uuid,
    pub rating: i32,
    pub recommendation: Recommendation,
    pub content: Option<String>,
    pub images: Vec<String>,
    pub daily_price: i32,
    pub regular_holidays: Vec<String>,
    pub power_rack_count: i32,
    pub smith_rack_count: i32,
    pub dumbbell_max_weight: Option<i32>,
    pub machine_brands: Vec<String>,
    pub amenities: Vec<String>,
}

/// The wizard itself: current step + accumulated draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWizard {
    step: WizardStep,
    draft: ReviewDraft,
}

impl Default for ReviewWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewWizard {
    pub fn new() -> Self {
        ReviewWizard {
            step: WizardStep::SelectGym,
            draft: ReviewDraft::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    /// Pick the gym being reviewed (allowed at any step before submit)
    pub fn select_gym(&mut self, selection: SelectedGym) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        self.draft.selected_gym = Some(selection);
        Ok(())
    }

    /// Set the one-day pass price (must be positive)
    pub fn set_daily_price(&mut self, price: i32) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        if price <= 0 {
            return Err(GymsError::ValidationFailed(
                "daily_price must be positive".into(),
            ));
        }
        self.draft.daily_price = Some(price);
        Ok(())
    }

    /// Toggle a regular-holiday entry
    /// DOCUMENTATION: "없음" and named days are mutually exclusive -
    /// picking one side clears the other
    pub fn toggle_holiday(&mut self, day: &str) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;

        if day == HOLIDAY_NONE {
            if self.draft.regular_holidays.iter().any(|d| d == HOLIDAY_NONE) {
                self.draft.regular_holidays.clear();
            } else {
                self.draft.regular_holidays = vec![HOLIDAY_NONE.to_string()];
            }
            return Ok(());
        }

        if !WEEKDAY_LABELS.contains(&day) {
            return Err(GymsError::InvalidInput(format!(
                "unknown holiday label: {}",
                day
            )));
        }

        self.draft.regular_holidays.retain(|d| d != HOLIDAY_NONE);
        if let Some(pos) = self.draft.regular_holidays.iter().position(|d| d == day) {
            self.draft.regular_holidays.remove(pos);
        } else {
            self.draft.regular_holidays.push(day.to_string());
        }
        Ok(())
    }

    /// Set the rack counts (zero permitted, negatives rejected)
    pub fn set_rack_counts(&mut self, power: i32, smith: i32) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        if power < 0 || smith < 0 {
            return Err(GymsError::ValidationFailed(
                "rack counts cannot be negative".into(),
            ));
        }
        self.draft.power_rack_count = Some(power);
        self.draft.smith_rack_count = Some(smith);
        Ok(())
    }

    pub fn set_dumbbell_max_weight(&mut self, kg: i32) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        if kg < 0 {
            return Err(GymsError::ValidationFailed(
                "dumbbell weight cannot be negative".into(),
            ));
        }
        self.draft.dumbbell_max_weight = Some(kg);
        Ok(())
    }

    pub fn toggle_machine_brand(&mut self, brand: &str) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        Self::toggle_label(&mut self.draft.machine_brands, brand);
        Ok(())
    }

    pub fn toggle_amenity(&mut self, amenity: &str) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        Self::toggle_label(&mut self.draft.amenities, amenity);
        Ok(())
    }

    pub fn add_photo(&mut self, url: String) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        self.draft.photos.push(url);
        Ok(())
    }

    /// Set the free-text comment
    /// DOCUMENTATION: Over-cap input is rejected, not truncated, to avoid
    /// silent data loss
    pub fn set_comment(&mut self, text: &str) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        let chars = text.chars().count();
        if chars > COMMENT_MAX_CHARS {
            return Err(GymsError::ValidationFailed(format!(
                "comment exceeds {} characters ({})",
                COMMENT_MAX_CHARS, chars
            )));
        }
        self.draft.comment = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
        Ok(())
    }

    pub fn set_recommendation(&mut self, rec: Recommendation) -> Result<(), GymsError> {
        self.ensure_not_submitted()?;
        self.draft.recommendation = Some(rec);
        Ok(())
    }

    /// Advance to the next step
    /// DOCUMENTATION: Blocked (error, no transition) until the current
    /// step's required fields are present
    pub fn advance(&mut self) -> Result<WizardStep, GymsError> {
        match self.step {
            WizardStep::SelectGym => {
                if self.draft.selected_gym.is_none() {
                    return Err(GymsError::ValidationFailed(
                        "a gym must be selected first".into(),
                    ));
                }
                self.step = WizardStep::BasicInfo;
            }
            WizardStep::BasicInfo => {
                if self.draft.daily_price.is_none() {
                    return Err(GymsError::ValidationFailed("daily_price is required".into()));
                }
                if self.draft.regular_holidays.is_empty() {
                    return Err(GymsError::ValidationFailed(
                        "at least one regular_holidays entry is required".into(),
                    ));
                }
                self.step = WizardStep::DetailedInfo;
            }
            WizardStep::DetailedInfo => {
                return Err(GymsError::ValidationFailed(
                    "the final step completes via submit".into(),
                ));
            }
            WizardStep::Submitted => {
                return Err(GymsError::ValidationFailed("wizard already submitted".into()));
            }
        }
        Ok(self.step)
    }

    /// Navigate back to an earlier step without losing any entered data
    pub fn back_to(&mut self, step: WizardStep) -> Result<WizardStep, GymsError> {
        self.ensure_not_submitted()?;
        if step >= self.step {
            return Err(GymsError::InvalidInput(
                "can only navigate to an earlier step".into(),
            ));
        }
        self.step = step;
        Ok(self.step)
    }

    /// Validate the submit gate and produce the submission payload
    /// DOCUMENTATION: Only reachable from DetailedInfo; the wizard stays in
    /// DetailedInfo until mark_submitted() confirms the store write
    pub fn finalize(&self, user_id: Uuid) -> Result<ReviewSubmission, GymsError> {
        if self.step != WizardStep::DetailedInfo {
            return Err(GymsError::ValidationFailed(
                "submit is only reachable from the detailed-info step".into(),
            ));
        }

        let selected_gym = self
            .draft
            .selected_gym
            .clone()
            .ok_or_else(|| GymsError::ValidationFailed("a gym must be selected".into()))?;
        let daily_price = self
            .draft
            .daily_price
            .ok_or_else(|| GymsError::ValidationFailed("daily_price is required".into()))?;
        if self.draft.regular_holidays.is_empty() {
            return Err(GymsError::ValidationFailed(
                "at least one regular_holidays entry is required".into(),
            ));
        }
        let power_rack_count = self
            .draft
            .power_rack_count
            .ok_or_else(|| GymsError::ValidationFailed("power_rack_count is required".into()))?;
        let smith_rack_count = self
            .draft
            .smith_rack_count
            .ok_or_else(|| GymsError::ValidationFailed("smith_rack_count is required".into()))?;
        let recommendation = self
            .draft
            .recommendation
            .ok_or_else(|| GymsError::ValidationFailed("recommendation is required".into()))?;

        Ok(ReviewSubmission {
            selected_gym,
            user_id,
            rating: recommendation.derived_rating(),
            recommendation,
            content: self.draft.comment.clone(),
            images: self.draft.photos.clone(),
            daily_price,
            regular_holidays: self.draft.regular_holidays.clone(),
            power_rack_count,
            smith_rack_count,
            dumbbell_max_weight: self.draft.dumbbell_max_weight,
            machine_brands: self.draft.machine_brands.clone(),
            amenities: self.draft.amenities.clone(),
        })
    }

    /// Confirm a successful store write: terminal state, draft discarded
    pub fn mark_submitted(&mut self) {
        self.step = WizardStep::Submitted;
        self.draft = ReviewDraft::default();
    }

    fn ensure_not_submitted(&self) -> Result<(), GymsError> {
        if self.step == WizardStep::Submitted {
            return Err(GymsError::ValidationFailed("wizard already submitted".into()));
        }
        Ok(())
    }

    fn toggle_label(labels: &mut Vec<String>, label: &str) {
        if let Some(pos) = labels.iter().position(|l| l == label) {
            labels.remove(pos);
        } else {
            labels.push(label.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> SelectedGym {
        SelectedGym::Registered {
            gym_id: Uuid::new_v4(),
        }
    }

    fn wizard_at_basic_info() -> ReviewWizard {
        let mut w = ReviewWizard::new();
        w.select_gym(selection()).unwrap();
        w.advance().unwrap();
        w
    }

    fn wizard_at_detailed_info() -> ReviewWizard {
        let mut w = wizard_at_basic_info();
        w.set_daily_price(20000).unwrap();
        w.toggle_holiday("일").unwrap();
        w.advance().unwrap();
        w
    }

    #[test]
    fn test_forward_blocked_without_selection() {
        let mut w = ReviewWizard::new();
        assert!(w.advance().is_err());
        assert_eq!(w.step(), WizardStep::SelectGym);

        w.select_gym(selection()).unwrap();
        assert_eq!(w.advance().unwrap(), WizardStep::BasicInfo);
    }

    #[test]
    fn test_basic_info_gate_requires_price_and_holiday() {
        let mut w = wizard_at_basic_info();

        // Neither field set
        assert!(w.advance().is_err());
        assert_eq!(w.step(), WizardStep::BasicInfo);

        // Price alone is not enough
        w.set_daily_price(15000).unwrap();
        assert!(w.advance().is_err());

        // Both present -> accepted
        w.toggle_holiday("월").unwrap();
        assert_eq!(w.advance().unwrap(), WizardStep::DetailedInfo);
    }

    #[test]
    fn test_daily_price_must_be_positive() {
        let mut w = wizard_at_basic_info();
        assert!(w.set_daily_price(0).is_err());
        assert!(w.set_daily_price(-100).is_err());
        assert!(w.set_daily_price(12000).is_ok());
    }

    #[test]
    fn test_holiday_none_clears_named_days() {
        let mut w = wizard_at_basic_info();
        w.toggle_holiday("월").unwrap();
        w.toggle_holiday("수").unwrap();
        assert_eq!(w.draft().regular_holidays, vec!["월", "수"]);

        w.toggle_holiday(HOLIDAY_NONE).unwrap();
        assert_eq!(w.draft().regular_holidays, vec![HOLIDAY_NONE]);
    }

    #[test]
    fn test_named_day_removes_holiday_none() {
        let mut w = wizard_at_basic_info();
        w.toggle_holiday(HOLIDAY_NONE).unwrap();
        w.toggle_holiday("토").unwrap();
        assert_eq!(w.draft().regular_holidays, vec!["토"]);
    }

    #[test]
    fn test_holiday_toggle_off_and_unknown_label() {
        let mut w = wizard_at_basic_info();
        w.toggle_holiday("금").unwrap();
        w.toggle_holiday("금").unwrap();
        assert!(w.draft().regular_holidays.is_empty());

        assert!(w.toggle_holiday("Monday").is_err());
    }

    #[test]
    fn test_comment_cap_rejects_over_500_chars() {
        let mut w = wizard_at_detailed_info();

        let at_cap = "가".repeat(COMMENT_MAX_CHARS);
        assert!(w.set_comment(&at_cap).is_ok());

        let over_cap = "가".repeat(COMMENT_MAX_CHARS + 1);
        assert!(w.set_comment(&over_cap).is_err());
        // Rejected input does not clobber the previous comment
        assert_eq!(w.draft().comment.as_ref().unwrap().chars().count(), 500);
    }

    #[test]
    fn test_submit_refused_without_recommendation() {
        let mut w = wizard_at_detailed_info();
        w.set_rack_counts(6, 4).unwrap();

        let user = Uuid::new_v4();
        assert!(w.finalize(user).is_err());

        w.set_recommendation(Recommendation::NotRecommend).unwrap();
        let submission = w.finalize(user).unwrap();
        assert_eq!(submission.rating, 1);
        assert_eq!(submission.power_rack_count, 6);
    }

    #[test]
    fn test_zero_rack_counts_are_permitted() {
        let mut w = wizard_at_detailed_info();
        w.set_rack_counts(0, 0).unwrap();
        w.set_recommendation(Recommendation::Recommend).unwrap();

        let submission = w.finalize(Uuid::new_v4()).unwrap();
        assert_eq!(submission.rating, 5);
        assert_eq!(submission.power_rack_count, 0);
        assert_eq!(submission.smith_rack_count, 0);
    }

    #[test]
    fn test_negative_rack_counts_rejected() {
        let mut w = wizard_at_detailed_info();
        assert!(w.set_rack_counts(-1, 4).is_err());
        assert!(w.set_rack_counts(6, -2).is_err());
    }

    #[test]
    fn test_submit_only_reachable_from_detailed_info() {
        let w = wizard_at_basic_info();
        assert!(w.finalize(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_back_navigation_preserves_draft() {
        let mut w = wizard_at_detailed_info();
        w.set_rack_counts(6, 4).unwrap();

        w.back_to(WizardStep::SelectGym).unwrap();
        assert_eq!(w.step(), WizardStep::SelectGym);

        // Everything entered earlier is still there
        assert_eq!(w.draft().daily_price, Some(20000));
        assert_eq!(w.draft().regular_holidays, vec!["일"]);
        assert_eq!(w.draft().power_rack_count, Some(6));

        // Forward passes the gates again without re-entry
        assert_eq!(w.advance().unwrap(), WizardStep::BasicInfo);
        assert_eq!(w.advance().unwrap(), WizardStep::DetailedInfo);
    }

    #[test]
    fn test_back_refuses_forward_jump() {
        let mut w = wizard_at_basic_info();
        assert!(w.back_to(WizardStep::DetailedInfo).is_err());
        assert!(w.back_to(WizardStep::BasicInfo).is_err());
        assert!(w.back_to(WizardStep::SelectGym).is_ok());
    }

    #[test]
    fn test_mark_submitted_clears_draft_and_is_terminal() {
        let mut w = wizard_at_detailed_info();
        w.set_rack_counts(2, 1).unwrap();
        w.set_recommendation(Recommendation::Recommend).unwrap();
        w.finalize(Uuid::new_v4()).unwrap();

        w.mark_submitted();
        assert_eq!(w.step(), WizardStep::Submitted);
        assert!(w.draft().selected_gym.is_none());
        assert!(w.draft().daily_price.is_none());

        // Terminal: no further edits or navigation
        assert!(w.set_daily_price(1000).is_err());
        assert!(w.advance().is_err());
        assert!(w.back_to(WizardStep::SelectGym).is_err());
    }

    #[test]
    fn test_derived_rating() {
        assert_eq!(Recommendation::Recommend.derived_rating(), 5);
        assert_eq!(Recommendation::NotRecommend.derived_rating(), 1);
    }
}
