use crate::components::icons::{Activity, CheckCircle, Compass, ShieldCheck, Sparkles};
use crate::components::top_nav::TopNav;
use crate::web::router::Link;
use leptos::prelude::*;

const THERAPIES: &[(&str, &str)] = &[
    (
        "Acupuncture",
        "Restore the flow of energy with fine-needle therapy from certified practitioners.",
    ),
    (
        "Ayurveda",
        "Personalised plans rooted in the ancient science of balance and diet.",
    ),
    (
        "Chiropractic",
        "Spinal care and alignment for everyday mobility and pain relief.",
    ),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-100 font-sans">
            <TopNav />

            <section class="hero min-h-[70vh] bg-gradient-to-br from-primary/10 to-secondary/10">
                <div class="hero-content text-center">
                    <div class="max-w-2xl space-y-6">
                        <div class="badge badge-primary badge-outline gap-2 p-3">
                            <Sparkles attr:class="h-4 w-4" />
                            "Holistic care, verified practitioners"
                        </div>
                        <h1 class="text-5xl font-bold">"Your Path to Holistic Wellness"</h1>
                        <p class="text-lg text-base-content/70">
                            "Connect with verified practitioners of traditional and complementary therapies. Book sessions, track your journey and feel better."
                        </p>
                        <div class="flex flex-col sm:flex-row gap-4 justify-center">
                            <Link to="/register?role=PATIENT" class="btn btn-primary btn-lg">
                                "Find a Practitioner"
                            </Link>
                            <Link to="/register?role=PRACTITIONER" class="btn btn-outline btn-lg">
                                "Join as Practitioner"
                            </Link>
                        </div>
                    </div>
                </div>
            </section>

            <section class="py-16 px-4 md:px-8 max-w-6xl mx-auto">
                <h2 class="text-3xl font-bold text-center mb-10">"Popular Therapies"</h2>
                <div class="grid md:grid-cols-3 gap-6">
                    {THERAPIES
                        .iter()
                        .map(|(name, blurb)| {
                            view! {
                                <div class="card bg-base-200 shadow-md">
                                    <div class="card-body">
                                        <Activity attr:class="h-8 w-8 text-primary" />
                                        <h3 class="card-title">{*name}</h3>
                                        <p class="text-base-content/70">{*blurb}</p>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="py-16 px-4 md:px-8 bg-base-200">
                <div class="max-w-6xl mx-auto grid md:grid-cols-3 gap-8 text-center">
                    <div class="space-y-2">
                        <ShieldCheck attr:class="h-10 w-10 mx-auto text-primary" />
                        <h3 class="font-bold text-lg">"Verified Experts"</h3>
                        <p class="text-base-content/70">
                            "Every practitioner's credentials are reviewed before they appear."
                        </p>
                    </div>
                    <div class="space-y-2">
                        <Compass attr:class="h-10 w-10 mx-auto text-primary" />
                        <h3 class="font-bold text-lg">"Easy Discovery"</h3>
                        <p class="text-base-content/70">
                            "Search by name or specialization and book in a few clicks."
                        </p>
                    </div>
                    <div class="space-y-2">
                        <CheckCircle attr:class="h-10 w-10 mx-auto text-primary" />
                        <h3 class="font-bold text-lg">"Your Journey, Tracked"</h3>
                        <p class="text-base-content/70">
                            "See upcoming sessions and your booking history in one place."
                        </p>
                    </div>
                </div>
            </section>

            <section class="py-16 px-4 text-center space-y-6">
                <h2 class="text-3xl font-bold">"Ready to Start Your Wellness Journey?"</h2>
                <Link to="/register" class="btn btn-primary btn-lg">
                    "Create Your Account"
                </Link>
            </section>

            <footer class="footer footer-center p-6 bg-base-300 text-base-content">
                <p>"© 2026 Wellness Hub Marketplace"</p>
            </footer>
        </div>
    }
}
