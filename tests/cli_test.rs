use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use checkout_flow::config::ENV_PUBLISHABLE_KEY;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_offline_checkout_end_to_end() {
    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.args(["--offline", "--card-holder", "Asha Rao"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total Amount: ₹306.28"))
        .stdout(predicate::str::contains(
            "Payment successful! Your order has been placed.",
        ));
}

#[test]
fn test_offline_missing_card_holder_shows_error_banner() {
    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.args(["--offline", "--card-holder", ""]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "[ERROR] Please enter the card holder name.",
        ))
        .stdout(predicate::str::contains("Payment successful").not());
}

#[test]
fn test_missing_key_shows_config_warning_instead_of_paying() {
    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.args(["--card-holder", "Asha Rao"]);
    cmd.env_remove(ENV_PUBLISHABLE_KEY);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[WARNING] Payment client not configured"))
        .stdout(predicate::str::contains("Payment successful").not());
}

#[test]
fn test_card_holder_argument_is_required() {
    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.arg("--offline");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--card-holder"));
}
