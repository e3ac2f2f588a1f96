use crate::classify::{api_relevance, category_from_description, TWITTER_NEGATIVE, TWITTER_POSITIVE};
use crate::source::preview;
use crate::twitter::types::{Place, SearchResponse, User};
use factwatch_common::{Claim, Source};
use factwatch_nlp::lexicon_sentiment;
use rand::Rng;

const PREVIEW_CHARS: usize = 120;

/// Map an API search response into claims, joining authors and places from
/// `includes`. `rng` drives the relevance jitter.
pub fn claims_from_search<R: Rng + ?Sized>(resp: SearchResponse, rng: &mut R) -> Vec<Claim> {
    let includes = resp.includes.unwrap_or_default();
    let users = includes.users.unwrap_or_default();
    let places = includes.places.unwrap_or_default();

    resp.data
        .unwrap_or_default()
        .into_iter()
        .map(|tweet| {
            let user: Option<&User> = tweet
                .author_id
                .as_deref()
                .and_then(|aid| users.iter().find(|u| u.id == aid));
            let region = tweet
                .geo
                .as_ref()
                .and_then(|g| g.place_id.as_deref())
                .and_then(|pid| places.iter().find(|p| p.id == pid))
                .and_then(place_name);
            let verified = user.and_then(|u| u.verified).unwrap_or(false);
            let category = category_from_description(user.and_then(|u| u.description.as_deref()));

            let mut claim = Claim::new(Source::Twitter, tweet.text.clone())
                .with_summary(preview(&tweet.text, PREVIEW_CHARS))
                .with_sentiment(lexicon_sentiment(&tweet.text, TWITTER_POSITIVE, TWITTER_NEGATIVE))
                .with_relevance(api_relevance(rng.gen::<f64>(), verified))
                .with_timestamp_str(tweet.created_at.as_deref())
                .with_username(user.map_or("anonymous", |u| u.username.as_str()))
                .with_followers(
                    user.and_then(|u| u.public_metrics.as_ref())
                        .and_then(|m| m.followers_count),
                )
                .with_category(category)
                .with_verified(verified)
                .with_region(region);
            claim.language = tweet.lang;
            claim
        })
        .collect()
}

fn place_name(place: &Place) -> Option<String> {
    place.full_name.clone().or_else(|| place.name.clone())
}
