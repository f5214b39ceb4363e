pub fn render() -> String {
    "404\nPage Not Found\nThe page you are looking for doesn't exist or has been moved.\n\nBack to Home: /\n"
        .to_string()
}
