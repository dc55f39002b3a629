use crate::app::{report_failure, ExitStatus};
use crate::core::verifier::{TransferScenario, TransferVerifier};
use crate::core::ContractRuntime;

pub async fn run_verification<R: ContractRuntime>(
    runtime: R,
    scenario: TransferScenario,
) -> ExitStatus {
    let verifier = TransferVerifier::new(runtime, scenario);

    match verifier.run().await {
        Ok(outcome) => {
            println!("✅ Should transfer tokens between accounts");
            println!("   contract:  {}", outcome.contract.address);
            println!("   recipient: {} holds {}", outcome.recipient, outcome.recipient_balance);
            println!("   owner:     {} holds {}", outcome.owner, outcome.owner_balance);
            ExitStatus::Success
        }
        Err(e) => {
            report_failure("Transfer verification", &e);
            ExitStatus::Failure
        }
    }
}
