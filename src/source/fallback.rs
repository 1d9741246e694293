//! Built-in section markup used when a section source cannot be read.

/// Fallback source for the section `name`.
///
/// The four stock sections have dedicated placeholders; any other name gets
/// a generic one carrying its name as the heading.
pub fn fallback_source(name: &str) -> String {
    let body = match name {
        "HeroSection" => HERO,
        "FeaturesSection" => FEATURES,
        "ServicesSection" => SERVICES,
        "AboutSection" => ABOUT,
        _ => return generic(name),
    };
    wrap(name, body)
}

fn wrap(name: &str, body: &str) -> String {
    format!(
        "import React from 'react';\n\nexport default function {name}() {{\n  return (\n{body}\n  );\n}}"
    )
}

fn generic(name: &str) -> String {
    let body = format!(
        r#"    <section className="py-16 bg-white">
      <div className="container mx-auto px-4 text-center">
        <h2 className="text-3xl font-bold mb-6">{name}</h2>
        <p className="text-gray-600">This section could not be loaded</p>
      </div>
    </section>"#
    );
    wrap(name, &body)
}

const HERO: &str = r#"    <section className="bg-gradient-to-r from-blue-600 to-purple-600 text-white py-20">
      <div className="container mx-auto px-4 text-center">
        <h1 className="text-5xl font-bold mb-6">Hero Section</h1>
        <p className="text-xl mb-8">This is the hero section content</p>
        <button className="bg-white text-blue-600 px-8 py-3 rounded-lg font-semibold hover:bg-gray-100 transition-colors">
          Get Started
        </button>
      </div>
    </section>"#;

const FEATURES: &str = r#"    <section className="py-16 bg-gray-50">
      <div className="container mx-auto px-4">
        <h2 className="text-3xl font-bold text-center mb-12">Features</h2>
        <div className="grid grid-cols-1 md:grid-cols-3 gap-8">
          <div className="text-center p-6 bg-white rounded-lg shadow-sm">
            <h3 className="text-xl font-semibold mb-4">Feature 1</h3>
            <p className="text-gray-600">Description of feature 1</p>
          </div>
          <div className="text-center p-6 bg-white rounded-lg shadow-sm">
            <h3 className="text-xl font-semibold mb-4">Feature 2</h3>
            <p className="text-gray-600">Description of feature 2</p>
          </div>
          <div className="text-center p-6 bg-white rounded-lg shadow-sm">
            <h3 className="text-xl font-semibold mb-4">Feature 3</h3>
            <p className="text-gray-600">Description of feature 3</p>
          </div>
        </div>
      </div>
    </section>"#;

const SERVICES: &str = r#"    <section className="py-16 bg-white">
      <div className="container mx-auto px-4">
        <h2 className="text-3xl font-bold text-center mb-12">Services</h2>
        <div className="grid grid-cols-1 md:grid-cols-2 gap-8">
          <div className="p-6 border border-gray-200 rounded-lg hover:shadow-md transition-shadow">
            <h3 className="text-xl font-semibold mb-4">Service 1</h3>
            <p className="text-gray-600">Description of service 1</p>
          </div>
          <div className="p-6 border border-gray-200 rounded-lg hover:shadow-md transition-shadow">
            <h3 className="text-xl font-semibold mb-4">Service 2</h3>
            <p className="text-gray-600">Description of service 2</p>
          </div>
        </div>
      </div>
    </section>"#;

const ABOUT: &str = r#"    <section className="py-16 bg-gray-100">
      <div className="container mx-auto px-4">
        <div className="max-w-3xl mx-auto text-center">
          <h2 className="text-3xl font-bold mb-6">About Us</h2>
          <p className="text-lg text-gray-600 mb-6">
            We are a company dedicated to providing excellent services and solutions.
          </p>
          <p className="text-gray-600">
            Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod
            tempor incididunt ut labore et dolore magna aliqua.
          </p>
        </div>
      </div>
    </section>"#;
