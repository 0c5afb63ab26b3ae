#![allow(dead_code)]
use utoipa::OpenApi;

use crate::handlers::PostAdResponse;
use crate::logic::{CreateAdRequest, ImageUpload};
use classifieds_common::models::{Ad, AdUpdate};

#[utoipa::path(
    get,
    path = "/ads",
    responses(
        (status = 200, description = "All ads, newest first", body = [Ad])
    ),
    tag = "Ads"
)]
fn doc_list_ads_handler() {}

#[utoipa::path(
    post,
    path = "/ads",
    request_body(content = CreateAdRequest, example = json!({
        "name": "Bike",
        "desc": "Red, barely used",
        "year": "2020",
        "price": "100",
        "phone": "555-0100",
        "image": { "data": "data:image/jpeg;base64,/9j/4AAQ..." }
    })),
    responses(
        (status = 200, description = "Ad posted; devices with a push token are notified", body = PostAdResponse),
        (status = 400, description = "A field is empty",
         example = json!({ "error": { "message": "Please fill all the fields", "code": 400 } })
        ),
        (status = 401, description = "No signed-in user"),
        (status = 502, description = "Image upload failed")
    ),
    security(("bearer" = [])),
    tag = "Ads"
)]
fn doc_post_ad_handler() {}

#[utoipa::path(
    get,
    path = "/ads/mine",
    responses(
        (status = 200, description = "The caller's ads, newest first", body = [Ad]),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = [])),
    tag = "Ads"
)]
fn doc_list_own_ads_handler() {}

#[utoipa::path(
    get,
    path = "/ads/{id}",
    params(("id" = String, Path, description = "Ad id")),
    responses(
        (status = 200, description = "The ad", body = Ad),
        (status = 404, description = "No such ad")
    ),
    tag = "Ads"
)]
fn doc_get_ad_handler() {}

#[utoipa::path(
    put,
    path = "/ads/{id}",
    params(("id" = String, Path, description = "Ad id")),
    request_body(content = AdUpdate, example = json!({
        "name": "Bike",
        "desc": "Red, barely used",
        "price": "150",
        "year": "2020"
    })),
    responses(
        (status = 200, description = "The updated ad", body = Ad),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "The ad belongs to someone else"),
        (status = 404, description = "No such ad")
    ),
    security(("bearer" = [])),
    tag = "Ads"
)]
fn doc_edit_ad_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_list_ads_handler,
        doc_post_ad_handler,
        doc_list_own_ads_handler,
        doc_get_ad_handler,
        doc_edit_ad_handler
    ),
    components(schemas(Ad, AdUpdate, CreateAdRequest, ImageUpload, PostAdResponse)),
    tags((name = "Ads", description = "The ad feed, posting and editing"))
)]
pub struct AdsApiDoc;
