use tracing_forest::Processor;
use tracing_forest::printer::TestCapturePrinter;
use tracing_forest::tree::Tree;
use tracing_subscriber::prelude::*;

/// Drops trees that contain no events, so quiet transactions print nothing.
struct EventsOnly<P>(P);

impl<P: Processor> Processor for EventsOnly<P> {
    fn process(&self, tree: Tree) -> tracing_forest::processor::Result {
        fn has_events(tree: &Tree) -> bool {
            match tree {
                Tree::Event(_) => true,
                Tree::Span(span) => span.nodes().iter().any(has_events),
            }
        }

        if has_events(&tree) {
            self.0.process(tree)
        } else {
            Ok(())
        }
    }
}

fn module_tag(event: &tracing::Event<'_>) -> Option<tracing_forest::Tag> {
    let module = event
        .metadata()
        .target()
        .strip_prefix("ascom_alpaca_client::")?;
    Some(
        tracing_forest::Tag::builder()
            .prefix(module)
            .level(*event.metadata().level())
            .build(),
    )
}

#[ctor::ctor]
fn init_test_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("ascom_alpaca_client", tracing::Level::DEBUG),
        )
        .with(tracing_forest::ForestLayer::new(
            EventsOnly(TestCapturePrinter::new()),
            module_tag,
        ))
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::install().expect("Failed to install color_eyre");
}
