mod common;

use common::*;
use premium_facts::event::{intents, slots};
use premium_facts::recovery::{CATALOG_APOLOGY, DELIVERY_FAILURE, SAFE_UTTERANCE};
use premium_facts::speech::Phrasebook;
use premium_facts::{
    CorrelationTokens, DirectiveName, Event, IntentRequest, Skill, Slot, StaticProductCatalog,
};
use std::sync::Arc;
use tracing_test::traced_test;

fn category_intent(category: Slot) -> Event {
    Event::Intent(IntentRequest::new(intents::GET_CATEGORY_FACT).with_slot(category))
}

#[tokio::test]
async fn launch_lists_owned_products() {
    let skill = skill(vec![
        product("science_pack", true),
        product("history_pack", false),
        product("all_access", false),
    ]);
    let r = say(&skill, Event::Launch).await;
    assert!(r.speech.starts_with("Welcome to Premium Facts Sample."));
    assert!(r.speech.contains("You currently own science pack products."), "{}", r.speech);
    assert!(!r.speech.contains("history pack"));
    assert!(r.speech.contains("Tell me a fact"));
    assert!(r.speech.contains("Tell me a science fact"));
    assert!(r.reprompt.is_some());
    assert!(!r.should_end_session);
}

#[tokio::test]
async fn launch_without_products_offers_upsell_hint() {
    let r = say(&skill(vec![product("science_pack", false)]), Event::Launch).await;
    assert!(!r.speech.contains("You currently own"));
    assert!(r.speech.contains("What can I buy"));
}

#[traced_test]
#[tokio::test]
async fn catalog_failure_apologises() {
    let skill = Skill::new(context(Arc::new(DownCatalog))).unwrap();
    let r = say(&skill, Event::Launch).await;
    assert_eq!(r.speech, CATALOG_APOLOGY);
    assert_eq!(r.reprompt.as_deref(), Some(CATALOG_APOLOGY));
    assert!(!r.should_end_session);
    assert!(logs_contain("catalog unavailable"));
}

#[tokio::test]
async fn unowned_category_is_upsold_with_its_pack() {
    let history = product("history_pack", false);
    let skill = skill(vec![history.clone(), product("science_pack", true)]);
    let r = say(
        &skill,
        category_intent(Slot::new(slots::FACT_CATEGORY).resolved_to("history")),
    )
    .await;
    let directive = r.directive.expect("upsell directive");
    assert_eq!(directive.name, DirectiveName::Upsell);
    assert_eq!(directive.product_id, history.product_id);
    let message = directive.upsell_message.unwrap();
    assert!(message.starts_with("You don't currently own the history pack."));
    assert!(message.contains(&history.summary));
    assert!(message.ends_with("Want to learn more?"));
    assert!(!directive.token.is_empty());
    assert!(r.speech.is_empty());
}

#[tokio::test]
async fn missing_pack_upsells_the_bundle() {
    let bundle = product("all_access", false);
    let skill = skill(vec![bundle.clone()]);
    let r = say(
        &skill,
        category_intent(Slot::new(slots::FACT_CATEGORY).resolved_to("space")),
    )
    .await;
    assert_eq!(r.directive.unwrap().product_id, bundle.product_id);
}

#[tokio::test]
async fn unsellable_category_offers_a_random_fact() {
    let r = say(
        &skill(Vec::new()),
        category_intent(Slot::new(slots::FACT_CATEGORY).resolved_to("space")),
    )
    .await;
    assert!(r.directive.is_none());
    assert!(r.speech.contains("isn't available for purchase"));
    assert!(!r.should_end_session);
}

#[tokio::test]
async fn bundle_unlocks_every_category() {
    let skill = skill(vec![product("all_access", true), product("space_pack", false)]);
    let r = say(
        &skill,
        category_intent(Slot::new(slots::FACT_CATEGORY).resolved_to("space")),
    )
    .await;
    assert!(r.directive.is_none());
    assert!(r.speech.starts_with("Here's your space fact: "));
    let space = facts_in(Some("space"));
    assert!(space.iter().any(|f| r.speech.contains(f.as_str())), "{}", r.speech);
    assert!(ends_with_yes_no(&r.speech));
}

#[tokio::test]
async fn unknown_category_gets_a_clarifying_prompt() {
    let skill = skill(vec![product("all_access", true)]);
    let r = say(
        &skill,
        category_intent(
            Slot::new(slots::FACT_CATEGORY)
                .resolved_to("weather")
                .spoken_as("weather"),
        ),
    )
    .await;
    assert!(r.directive.is_none());
    assert!(r.speech.starts_with("I heard you say weather."));
    for category in ["science", "space", "history"] {
        assert!(r.speech.contains(category));
    }
    assert!(r.reprompt.is_some());
}

#[tokio::test]
async fn accepted_bundle_purchase_speaks_any_fact() {
    let bundle = product("all_access", true);
    let skill = skill(vec![bundle.clone()]);
    let r = say(
        &skill,
        answer(DirectiveName::Buy, 200, &bundle.product_id, Some("ACCEPTED")),
    )
    .await;
    assert!(r.speech.starts_with("You have unlocked the all access."));
    let all = facts_in(None);
    assert!(all.iter().any(|f| r.speech.contains(f.as_str())), "{}", r.speech);
    assert!(ends_with_yes_no(&r.speech));
    assert!(yes_no_questions().contains(r.reprompt.as_ref().unwrap()));
}

#[tokio::test]
async fn accepted_pack_purchase_speaks_its_category() {
    let pack = product("history_pack", true);
    let skill = skill(vec![pack.clone()]);
    let r = say(
        &skill,
        answer(DirectiveName::Buy, 200, &pack.product_id, Some("ACCEPTED")),
    )
    .await;
    assert!(r.speech.contains("Here is your history fact:"));
    let history = facts_in(Some("history"));
    assert!(history.iter().any(|f| r.speech.contains(f.as_str())));
}

#[tokio::test]
async fn declined_purchase_thanks_the_user() {
    let pack = product("space_pack", false);
    let skill = skill(vec![pack.clone()]);
    for result in ["DECLINED", "ERROR", "NOT_ENTITLED"] {
        let r = say(
            &skill,
            answer(DirectiveName::Buy, 200, &pack.product_id, Some(result)),
        )
        .await;
        assert!(r.speech.starts_with("Thanks for your interest in space pack."));
        assert_eq!(r.reprompt.as_deref(), Some("Would you like another random fact?"));
    }
}

#[tokio::test]
async fn already_purchased_resumes_the_loop() {
    let pack = product("space_pack", true);
    let r = say(
        &skill(vec![pack.clone()]),
        answer(DirectiveName::Buy, 200, &pack.product_id, Some("ALREADY_PURCHASED")),
    )
    .await;
    assert!(r.speech.ends_with("Do you want to hear a fact?"));
    assert!(!r.should_end_session);
}

#[traced_test]
#[tokio::test]
async fn unrecognised_purchase_result_falls_back() {
    let pack = product("space_pack", false);
    let r = say(
        &skill(vec![pack.clone()]),
        answer(DirectiveName::Buy, 200, &pack.product_id, Some("PENDING_PURCHASE")),
    )
    .await;
    assert!(r.speech.starts_with("Sorry. I cannot help with that."));
    assert!(logs_contain("PENDING_PURCHASE"));
}

#[tokio::test]
async fn purchase_answer_for_unknown_product_is_safe() {
    let r = say(
        &skill(vec![product("space_pack", false)]),
        answer(DirectiveName::Buy, 200, "amzn1.adg.product.gone", Some("ACCEPTED")),
    )
    .await;
    assert_eq!(r.speech, SAFE_UTTERANCE);
    assert_eq!(r.reprompt.as_deref(), Some(SAFE_UTTERANCE));
    assert!(!r.should_end_session);
}

#[tokio::test]
async fn declined_cancel_of_purchasable_product() {
    let pack = product("science_pack", false);
    let r = say(
        &skill(vec![pack.clone()]),
        answer(DirectiveName::Cancel, 200, &pack.product_id, Some("DECLINED")),
    )
    .await;
    assert!(r.speech.starts_with("You don't currently have a subscription."));
    assert!(yes_no_questions().contains(r.reprompt.as_ref().unwrap()));
}

#[tokio::test]
async fn declined_cancel_of_owned_product_is_neutral() {
    let pack = product("science_pack", true);
    let r = say(
        &skill(vec![pack.clone()]),
        answer(DirectiveName::Cancel, 200, &pack.product_id, Some("DECLINED")),
    )
    .await;
    assert!(yes_no_questions().contains(&r.speech));
}

#[tokio::test]
async fn accepted_cancel_confirms() {
    let pack = product("all_access", true);
    let r = say(
        &skill(vec![pack.clone()]),
        answer(DirectiveName::Cancel, 200, &pack.product_id, Some("ACCEPTED")),
    )
    .await;
    assert!(r.speech.starts_with("You have successfully cancelled your subscription."));
    assert!(ends_with_yes_no(&r.speech));
}

#[tokio::test]
async fn declined_upsell_gives_a_random_fact() {
    let r = say(
        &skill(Vec::new()),
        answer(DirectiveName::Upsell, 200, "whatever", Some("DECLINED")),
    )
    .await;
    assert!(r.speech.starts_with("Ok. Here's a random fact: "));
    assert!(ends_with_yes_no(&r.speech));
}

#[traced_test]
#[tokio::test]
async fn accepted_upsell_is_not_handled_yet() {
    let r = say(
        &skill(Vec::new()),
        answer(DirectiveName::Upsell, 200, "whatever", Some("ACCEPTED")),
    )
    .await;
    assert!(r.speech.starts_with("Sorry. I cannot help with that."));
    assert!(logs_contain("upsell outcome not handled"));
}

#[tokio::test]
async fn failed_delivery_is_generic_for_every_directive() {
    let pack = product("science_pack", false);
    let skill = skill(vec![pack.clone()]);
    for directive in DirectiveName::ALL {
        let r = say(
            &skill,
            answer(directive, 500, &pack.product_id, Some("ACCEPTED")),
        )
        .await;
        assert_eq!(r.speech, DELIVERY_FAILURE, "{directive}");
        assert!(!r.should_end_session);
        assert!(r.directive.is_none());
    }
}

#[tokio::test]
async fn failed_delivery_does_not_need_the_catalog() {
    let skill = Skill::new(context(Arc::new(DownCatalog))).unwrap();
    let r = say(&skill, answer(DirectiveName::Buy, 404, "p", None)).await;
    assert_eq!(r.speech, DELIVERY_FAILURE);
}

#[tokio::test]
async fn buy_directive_targets_a_product_in_the_snapshot() {
    let products = vec![
        product("science_pack", false),
        product("history_pack", false),
        product("all_access", false),
    ];
    let skill = skill(products.clone());
    for category in [None, Some("science"), Some("history")] {
        let mut request = IntentRequest::new(intents::BUY);
        if let Some(c) = category {
            request = request.with_slot(Slot::new(slots::PRODUCT_CATEGORY).resolved_to(c));
        }
        let r = say(&skill, Event::Intent(request)).await;
        let directive = r.directive.expect("buy directive");
        assert_eq!(directive.name, DirectiveName::Buy);
        assert!(products.iter().any(|p| p.product_id == directive.product_id));
        assert!(directive.upsell_message.is_none());
    }
}

#[tokio::test]
async fn buying_an_unsold_product_asks_again() {
    let r = say(
        &skill(vec![product("all_access", false)]),
        Event::Intent(
            IntentRequest::new(intents::BUY)
                .with_slot(Slot::new(slots::PRODUCT_CATEGORY).resolved_to("space")),
        ),
    )
    .await;
    assert!(r.directive.is_none());
    assert!(r.speech.starts_with("I don't think we have a product by that name."));
}

#[tokio::test]
async fn cancel_subscription_defaults_to_the_bundle() {
    let bundle = product("all_access", true);
    let r = say(&skill(vec![bundle.clone()]), intent(intents::CANCEL_SUBSCRIPTION)).await;
    let directive = r.directive.unwrap();
    assert_eq!(directive.name, DirectiveName::Cancel);
    assert_eq!(directive.product_id, bundle.product_id);
}

#[tokio::test]
async fn tokens_are_unique_unless_fixed() {
    let products = vec![product("all_access", false)];
    let unique = skill(products.clone());
    let a = say(&unique, intent(intents::BUY)).await.directive.unwrap();
    let b = say(&unique, intent(intents::BUY)).await.directive.unwrap();
    assert_ne!(a.token, b.token);

    let fixed = Skill::new(
        context(Arc::new(StaticProductCatalog::new(products)))
            .with_tokens(CorrelationTokens::Fixed("correlationToken".into())),
    )
    .unwrap();
    let c = say(&fixed, intent(intents::BUY)).await.directive.unwrap();
    assert_eq!(c.token, "correlationToken");
}

#[tokio::test]
async fn shopping_lists_purchasable_products() {
    let r = say(
        &skill(vec![
            product("science_pack", true),
            product("history_pack", false),
            product("space_pack", false),
        ]),
        intent(intents::SHOPPING),
    )
    .await;
    assert!(
        r.speech
            .contains("available for purchase at this time are history pack and space pack."),
        "{}",
        r.speech
    );
}

#[tokio::test]
async fn shopping_with_nothing_left() {
    let r = say(&skill(vec![product("all_access", true)]), intent(intents::SHOPPING)).await;
    assert!(r.speech.starts_with("There are no more products to buy."));
}

#[tokio::test]
async fn product_detail_reports_summary_and_buy_prompt() {
    let pack = product("space_pack", false);
    let r = say(
        &skill(vec![pack]),
        Event::Intent(
            IntentRequest::new(intents::PRODUCT_DETAIL)
                .with_slot(Slot::new(slots::PRODUCT_CATEGORY).resolved_to("space")),
        ),
    )
    .await;
    assert_eq!(
        r.speech,
        "The space pack unlocks more facts.  To buy it, say Buy space pack"
    );
    let r = say(&skill(Vec::new()), intent(intents::PRODUCT_DETAIL)).await;
    assert!(r.speech.starts_with("I don't think we have a product by that name."));
    assert_eq!(r.reprompt.as_deref(), Some("I didn't catch that. Can you try again?"));
}

#[tokio::test]
async fn yes_is_get_fact() {
    let skill = skill(Vec::new());
    for name in [intents::GET_FACT, intents::YES] {
        let r = say(&skill, intent(name)).await;
        assert!(r.speech.starts_with("Here's your random fact: "));
        assert!(ends_with_yes_no(&r.speech));
        assert!(!r.should_end_session);
    }
}

#[tokio::test]
async fn goodbyes_end_the_session() {
    let skill = skill(Vec::new());
    let goodbyes = premium_facts::speech::Phrasebook::default().goodbyes;
    for event in [
        intent(intents::NO),
        intent(intents::STOP),
        intent(intents::CANCEL),
        Event::SessionEnded,
    ] {
        let r = say(&skill, event).await;
        assert!(r.should_end_session);
        assert!(goodbyes.contains(&r.speech));
    }
}

#[tokio::test]
async fn help_needs_no_catalog() {
    let skill = Skill::new(context(Arc::new(DownCatalog))).unwrap();
    let r = say(&skill, intent(intents::HELP)).await;
    assert!(r.speech.starts_with("To hear a random fact"));
    let r = say(&skill, intent("SomethingElseIntent")).await;
    assert!(r.speech.starts_with("Sorry. I cannot help with that."));
}

#[tokio::test]
async fn envelope_round_trip() {
    let skill = skill(vec![product("science_pack", true)]);
    let request = serde_json::json!({
        "version": "1.0",
        "session": { "sessionId": "s-1" },
        "request": {
            "type": "IntentRequest",
            "locale": "en-US",
            "intent": { "name": "BuyIntent", "slots": {} }
        }
    });
    let out = skill.handle_envelope(&request.to_string()).await.unwrap();
    let v = serde_json::to_value(&out).unwrap();
    // the catalog has no bundle, so the user is asked to try again
    assert!(
        v["response"]["outputSpeech"]["ssml"]
            .as_str()
            .unwrap()
            .contains("I don't think we have a product by that name.")
    );
    assert_eq!(v["response"]["shouldEndSession"], false);
}

#[traced_test]
#[tokio::test]
async fn accepted_pack_without_facts_still_confirms_the_unlock() {
    let pack = product("ocean_pack", true);
    let r = say(
        &skill(vec![pack.clone()]),
        answer(DirectiveName::Buy, 200, &pack.product_id, Some("ACCEPTED")),
    )
    .await;
    assert!(r.speech.starts_with("You have unlocked the ocean pack."), "{}", r.speech);
    assert!(r.speech.contains("Here is your fact:"));
    let all = facts_in(None);
    assert!(all.iter().any(|f| r.speech.contains(f.as_str())), "{}", r.speech);
    assert!(ends_with_yes_no(&r.speech));
    assert!(!r.should_end_session);
    assert!(logs_contain("purchased pack has no facts"));
}

#[tokio::test]
async fn launch_example_names_an_owned_category() {
    let skill = skill(vec![product("history_pack", true), product("science_pack", false)]);
    let r = say(&skill, Event::Launch).await;
    assert!(r.speech.contains("Tell me a history fact"), "{}", r.speech);
    assert!(!r.speech.contains("Tell me a science fact"));
}

#[tokio::test]
async fn each_event_fetches_the_catalog_at_most_once() {
    let catalog = Arc::new(CountingCatalog::new(vec![
        product("science_pack", true),
        product("history_pack", false),
        product("all_access", false),
    ]));
    let skill = Skill::new(context(catalog.clone())).unwrap();
    let science = product("science_pack", true).product_id;
    let cases = [
        (Event::Launch, 1),
        (
            category_intent(Slot::new(slots::FACT_CATEGORY).resolved_to("history")),
            1,
        ),
        (intent(intents::BUY), 1),
        (intent(intents::SHOPPING), 1),
        (answer(DirectiveName::Buy, 200, &science, Some("ACCEPTED")), 1),
        (answer(DirectiveName::Cancel, 200, &science, Some("DECLINED")), 1),
        (answer(DirectiveName::Upsell, 200, &science, Some("DECLINED")), 0),
        (answer(DirectiveName::Buy, 500, &science, Some("ACCEPTED")), 0),
        (intent(intents::GET_FACT), 0),
        (intent(intents::HELP), 0),
        (intent(intents::FALLBACK), 0),
    ];
    for (event, expected) in cases {
        say(&skill, event.clone()).await;
        assert_eq!(catalog.take(), expected, "{event:?}");
    }
}

#[tokio::test]
async fn injected_phrasebook_is_spoken() {
    let phrases = Phrasebook {
        yes_no_questions: vec!["One more?".into()],
        goodbyes: vec!["Bye now.".into()],
    };
    let skill = Skill::new(
        context(Arc::new(StaticProductCatalog::new(Vec::new()))).with_phrases(phrases),
    )
    .unwrap();
    let r = say(&skill, intent(intents::GET_FACT)).await;
    assert!(r.speech.ends_with(" One more?"), "{}", r.speech);
    assert_eq!(r.reprompt.as_deref(), Some("One more?"));
    let r = say(&skill, intent(intents::NO)).await;
    assert_eq!(r.speech, "Bye now.");
    assert!(r.should_end_session);
}
