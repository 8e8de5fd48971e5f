use payprobe::domain::config::Config;
use payprobe::domain::payment::{FormParams, IntentParams};
use payprobe::domain::ports::{ClientFactoryBox, MountSurfacesHandle};
use payprobe::domain::widget::OutcomeCallbacks;
use payprobe::infrastructure::in_memory::InMemorySurfaces;
use payprobe::infrastructure::simulated::SimulatedClientFactory;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let simulated = SimulatedClientFactory::default();
    let driver = simulated.driver();
    let factory: ClientFactoryBox = Box::new(simulated);
    let surfaces: MountSurfacesHandle =
        Arc::new(InMemorySurfaces::with_surfaces(["card-element"]));

    let config = Config::new("pk_1", "b1");
    let client = factory.create(&config.normalize().unwrap()).await.unwrap();

    // Verify Send + Sync by spawning tasks
    let intent_client = Arc::clone(&client);
    let intent_config = config.clone();
    let intent_handle = tokio::spawn(async move {
        intent_client
            .create_payment_intent(IntentParams::test_intent(&intent_config))
            .await
            .unwrap()
    });

    let mount_handle = tokio::spawn(async move {
        assert!(surfaces.exists("card-element"));
        client
            .mount_card_form(
                FormParams::test_form(&config, "card-element"),
                OutcomeCallbacks::new(|_| {}),
            )
            .await
            .unwrap();
    });

    let intent = intent_handle.await.unwrap();
    assert!(intent.id.starts_with("pi_sim_"));

    mount_handle.await.unwrap();
    assert_eq!(driver.pending(), 1);
}
