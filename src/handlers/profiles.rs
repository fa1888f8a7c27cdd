use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Identity;
use crate::domain::{EducationItem, ExperienceItem, Profile, ProfilePatch};
use crate::error::ApiError;
use crate::routes::AppState;

use super::{non_empty, parse_id, require_present};

/// GET /api/profiles/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let profile = state
        .store
        .profile_by_user(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("No Profile Found"))?;

    Ok(Json(json!({ "profile": profile })))
}

/// POST /api/profiles - create the authenticated user's profile
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ProfilePatch>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    require_present(&body.company, "Company is Required", &mut errors);
    require_present(&body.website, "Website is Required", &mut errors);
    require_present(&body.location, "Location is Required", &mut errors);
    require_present(&body.designation, "Designation is Required", &mut errors);
    require_present(&body.skills, "Skills is Required", &mut errors);
    require_present(&body.bio, "Bio is Required", &mut errors);
    require_present(&body.github_username, "GithubUsername is Required", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    if state.store.profile_by_user(identity.id).await?.is_some() {
        return Err(ApiError::conflict("Profile already Exists"));
    }

    let profile = Profile::from_patch(identity.id, &body);
    state.store.insert_profile(&profile).await?;
    Ok(Json(json!({ "profile": profile })))
}

/// PUT /api/profiles - partial update of the authenticated user's profile.
///
/// Fields are applied exactly when present in the request body; the merge is
/// a single store operation rather than load-then-save.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ProfilePatch>,
) -> Result<Json<Value>, ApiError> {
    let merge = body.to_merge_document();
    let profile = state
        .store
        .merge_profile(identity.id, &merge)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile Not Found"))?;

    Ok(Json(json!({ "profile": profile })))
}

/// GET /api/profiles - public listing
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let profiles = state.store.list_profiles().await?;
    Ok(Json(json!({ "developers": profiles })))
}

/// GET /api/profiles/users/:user_id - public profile of one user
pub async fn get_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_id(&user_id, "Profile Not Found")?;
    let profile = state
        .store
        .profile_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile Not Found"))?;

    Ok(Json(json!({ "developer": profile })))
}

/// DELETE /api/profiles/users/:user_id - delete profile, posts and account.
///
/// Embedded entries die with their parents; the user's posts are removed in
/// the same cascade.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_id(&user_id, "User Not Found")?;
    if user_id != identity.id {
        return Err(ApiError::forbidden("User is not authorized"));
    }

    if !state.store.delete_profile_by_user(user_id).await? {
        return Err(ApiError::not_found("Profile Not Found"));
    }
    state.store.delete_posts_by_user(user_id).await?;
    if !state.store.delete_user(user_id).await? {
        return Err(ApiError::not_found("User Not Found"));
    }

    tracing::info!(user = %user_id, "account deleted");
    Ok(Json(json!({ "msg": "Account Deleted" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

/// PUT /api/profiles/experience
pub async fn add_experience(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ExperienceRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    let title = non_empty(body.title, "Title is Required", &mut errors);
    let company = non_empty(body.company, "Company is Required", &mut errors);
    let location = non_empty(body.location, "Location is Required", &mut errors);
    let from = non_empty(body.from, "From is Required", &mut errors);
    let description = non_empty(body.description, "Description is Required", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let mut profile = state
        .store
        .profile_by_user(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile Not Found"))?;

    profile.add_experience(ExperienceItem {
        id: Uuid::new_v4(),
        title,
        company,
        location,
        from,
        to: body.to,
        current: body.current.unwrap_or(false),
        description,
    });
    state.store.save_profile(&profile).await?;
    Ok(Json(json!({ "profile": profile })))
}

/// DELETE /api/profiles/experience/:exp_id
pub async fn delete_experience(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(exp_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let exp_id = parse_id(&exp_id, "Experience Not Found")?;

    let mut profile = state
        .store
        .profile_by_user(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile Not Found"))?;

    profile
        .remove_experience(exp_id)
        .map_err(|_| ApiError::not_found("Experience Not Found"))?;
    state.store.save_profile(&profile).await?;
    Ok(Json(json!({ "profile": profile })))
}

/// PUT /api/profiles/education
pub async fn add_education(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<EducationRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    let school = non_empty(body.school, "School is Required", &mut errors);
    let degree = non_empty(body.degree, "Degree is Required", &mut errors);
    let field_of_study = non_empty(body.field_of_study, "FieldOfStudy is Required", &mut errors);
    let from = non_empty(body.from, "From is Required", &mut errors);
    let description = non_empty(body.description, "Description is Required", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let mut profile = state
        .store
        .profile_by_user(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile Not Found"))?;

    profile.add_education(EducationItem {
        id: Uuid::new_v4(),
        school,
        degree,
        field_of_study,
        from,
        to: body.to,
        current: body.current.unwrap_or(false),
        description,
    });
    state.store.save_profile(&profile).await?;
    Ok(Json(json!({ "profile": profile })))
}

/// DELETE /api/profiles/education/:edu_id
pub async fn delete_education(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(edu_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let edu_id = parse_id(&edu_id, "Education Not Found")?;

    let mut profile = state
        .store
        .profile_by_user(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile Not Found"))?;

    profile
        .remove_education(edu_id)
        .map_err(|_| ApiError::not_found("Education Not Found"))?;
    state.store.save_profile(&profile).await?;
    Ok(Json(json!({ "profile": profile })))
}
